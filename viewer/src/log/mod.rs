//! Trace logging for the viewer

mod lazy_file_writer;
mod tracing;

pub use self::tracing::TracingLevel;
