//! File tracing with a level that can change at runtime

use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};

use strum::{EnumString, FromRepr, IntoStaticStr};
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

use super::lazy_file_writer::LazyFileWriter;

/// Name of the trace file in the temp directory
const TRACE_LOG_FILE_NAME: &str = "holocron_trace.log";

/// HTTP stack targets that only add connection noise
const QUIET_TARGETS: [&str; 5] = ["reqwest::", "hyper", "h2::", "rustls::", "want::"];

static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(TracingLevel::Warn as u8);

/// Verbosity of the trace file, adjustable while running
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, FromRepr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum TracingLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<TracingLevel> for Level {
    fn from(level: TracingLevel) -> Self {
        match level {
            TracingLevel::Error => Self::ERROR,
            TracingLevel::Warn => Self::WARN,
            TracingLevel::Info => Self::INFO,
            TracingLevel::Debug => Self::DEBUG,
            TracingLevel::Trace => Self::TRACE,
        }
    }
}

impl TracingLevel {
    pub fn as_str(self) -> &'static str { self.into() }

    /// Install the file subscriber and set the starting level
    pub fn init_file_tracing(level: Self) {
        Self::set_tracing_level(level);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(LazyFileWriter::new(Self::get_trace_log_path()))
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        Registry::default()
            .with(LevelGate)
            .with(file_layer)
            .init();
    }

    pub fn set_tracing_level(level: Self) { CURRENT_LEVEL.store(level as u8, Ordering::Relaxed); }

    pub fn get_current_tracing_level() -> Self {
        Self::from_repr(CURRENT_LEVEL.load(Ordering::Relaxed)).unwrap_or(Self::Warn)
    }

    pub fn get_trace_log_path() -> PathBuf { std::env::temp_dir().join(TRACE_LOG_FILE_NAME) }
}

/// Drops events above the current level and everything from [`QUIET_TARGETS`]
struct LevelGate;

impl<S: Subscriber> Layer<S> for LevelGate {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        let target = metadata.target();
        if QUIET_TARGETS.iter().any(|quiet| target.starts_with(quiet)) {
            return false;
        }

        *metadata.level() <= Level::from(TracingLevel::get_current_tracing_level())
    }
}
