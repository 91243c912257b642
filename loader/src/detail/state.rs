//! Load state published by the detail loader

use std::sync::Arc;

use strum_macros::{Display, IntoStaticStr};

use crate::error::{Error, FailureKind};
use crate::records::CharacterDetail;

/// Why a load ended in [`LoadState::Failed`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    kind:   FailureKind,
    reason: String,
}

impl LoadFailure {
    /// Classify an error into the reason shown to the user
    pub fn from_error(error: &Error) -> Self {
        Self {
            kind:   error.kind(),
            reason: error.reason(),
        }
    }

    /// Failure class
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Human-readable reason
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Tri-state result of a detail load, plus the initial idle state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// No load has been started yet
    #[default]
    Idle,
    /// A load is in flight
    Pending,
    /// The load ended in a failure
    Failed(LoadFailure),
    /// Both records were fetched and merged
    Ready(Arc<CharacterDetail>),
}

/// Variant name of a [`LoadState`], for logging
#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum LoadStatus {
    /// See [`LoadState::Idle`]
    Idle,
    /// See [`LoadState::Pending`]
    Pending,
    /// See [`LoadState::Failed`]
    Failed,
    /// See [`LoadState::Ready`]
    Ready,
}

impl LoadState {
    /// Variant name without payload
    pub const fn status(&self) -> LoadStatus {
        match self {
            Self::Idle => LoadStatus::Idle,
            Self::Pending => LoadStatus::Pending,
            Self::Failed(_) => LoadStatus::Failed,
            Self::Ready(_) => LoadStatus::Ready,
        }
    }

    /// Whether the load has concluded, successfully or not
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Ready(_))
    }

    /// The merged record, when ready
    pub fn detail(&self) -> Option<&CharacterDetail> {
        match self {
            Self::Ready(detail) => Some(detail.as_ref()),
            _ => None,
        }
    }

    /// The failure, when failed
    pub const fn failure(&self) -> Option<&LoadFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Everything a reader sees on the loader's watch channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSnapshot {
    /// Incremented every time a load starts; zero before the first load
    pub generation: u64,
    /// Identifier of the most recent load as supplied by the caller
    pub identifier: Option<String>,
    /// Current state
    pub state:      LoadState,
}

/// What a single `load` call achieved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The call's result was published
    Applied(LoadState),
    /// A newer call started first; this call's result was discarded
    Superseded,
}

impl LoadOutcome {
    /// The published state, unless superseded
    pub const fn state(&self) -> Option<&LoadState> {
        match self {
            Self::Applied(state) => Some(state),
            Self::Superseded => None,
        }
    }
}
