//! Detail view loading: the dependent-fetch state machine and the state it publishes

mod loader;
mod state;

pub use loader::DetailLoader;
pub use state::{LoadFailure, LoadOutcome, LoadSnapshot, LoadState, LoadStatus};
