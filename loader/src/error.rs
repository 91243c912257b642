//! Error types and the failure taxonomy shown to users

use strum_macros::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

use crate::constants::{MSG_UNEXPECTED_CATALOG_FAILURE, MSG_UNEXPECTED_FAILURE};

// Error message prefixes
const MSG_INVALID_PREFIX: &str = "Invalid";

/// Result type for the `holocron_loader` library
pub type Result<T> = std::result::Result<T, error_stack::Report<Error>>;

/// The resource a fetch was trying to obtain
#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
pub enum Subject {
    /// The primary character record
    #[strum(serialize = "character data")]
    Character,
    /// The homeworld record referenced by a character
    #[strum(serialize = "homeworld data")]
    Homeworld,
    /// The first page of the character listing
    #[strum(serialize = "character listing")]
    Catalog,
}

/// Classification of a load failure, as seen by the presentation layer
#[derive(Display, EnumString, Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// No identifier was supplied; no request was made
    MissingInput,
    /// The upstream service answered with a non-success status
    UpstreamRejection,
    /// The upstream service could not be reached
    ConnectivityFault,
    /// Anything else, including unparseable bodies
    UnexpectedFault,
}

/// Errors raised while resolving configuration or fetching records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A load was started without an identifier
    #[error("no identifier provided")]
    MissingIdentifier,

    /// The upstream service returned a non-success status
    #[error("Failed to fetch {subject}: HTTP {status} {status_text} for {target}")]
    Rejected {
        /// What was being fetched
        subject:     Subject,
        /// Numeric HTTP status
        status:      u16,
        /// Reason phrase for the status
        status_text: String,
        /// The identifier or reference that was requested
        target:      String,
    },

    /// The transport could not reach the upstream service
    #[error(
        "Network error while fetching {subject} for {target}: the remote service may be unreachable, check your connection"
    )]
    Connectivity {
        /// What was being fetched
        subject: Subject,
        /// The identifier or reference that was requested
        target:  String,
    },

    /// A response body did not have the expected shape
    #[error("Failed to parse {subject}: {details}")]
    Decode {
        /// What was being parsed
        subject: Subject,
        /// Parser diagnostics
        details: String,
    },

    /// The configuration could not be used
    #[error("Configuration error: {0}")]
    InvalidConfiguration(String),

    /// Any other fault
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    // Builder methods for common patterns

    /// Create a rejection error from a response status
    pub fn rejected(
        subject: Subject,
        status: u16,
        status_text: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::Rejected {
            subject,
            status,
            status_text: status_text.into(),
            target: target.into(),
        }
    }

    /// Create a connectivity error for the given fetch
    pub fn connectivity(subject: Subject, target: impl Into<String>) -> Self {
        Self::Connectivity {
            subject,
            target: target.into(),
        }
    }

    /// Create a decode error for the given fetch
    pub fn decode(subject: Subject, details: impl std::fmt::Display) -> Self {
        Self::Decode {
            subject,
            details: details.to_string(),
        }
    }

    /// Create an "Invalid X" configuration error
    pub fn invalid(what: &str, details: impl std::fmt::Display) -> Self {
        Self::InvalidConfiguration(format!("{MSG_INVALID_PREFIX} {what}: {details}"))
    }

    /// Create an error for faults with no better classification
    pub fn unexpected(details: impl std::fmt::Display) -> Self {
        Self::Unexpected(details.to_string())
    }

    /// The failure class this error is reported as
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::MissingIdentifier => FailureKind::MissingInput,
            Self::Rejected { .. } => FailureKind::UpstreamRejection,
            Self::Connectivity { .. } => FailureKind::ConnectivityFault,
            Self::Decode { .. } | Self::InvalidConfiguration(_) | Self::Unexpected(_) => {
                FailureKind::UnexpectedFault
            },
        }
    }

    /// Human-readable reason shown to the user
    ///
    /// Unexpected faults collapse to a generic message; their details stay in the log.
    pub fn reason(&self) -> String {
        match self {
            Self::Decode {
                subject: Subject::Catalog,
                ..
            } => MSG_UNEXPECTED_CATALOG_FAILURE.to_string(),
            Self::Decode { .. } | Self::Unexpected(_) => MSG_UNEXPECTED_FAILURE.to_string(),
            _ => self.to_string(),
        }
    }
}
