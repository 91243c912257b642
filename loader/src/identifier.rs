//! Validated character identifier

use std::fmt;

use error_stack::Report;

use crate::error::{Error, Result};

/// Opaque identifier of a character record
///
/// The only validation is presence: absent, empty, or whitespace-only values are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacterId(String);

impl CharacterId {
    /// Parse an identifier supplied by the caller
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => Ok(Self(value.to_string())),
            _ => Err(Report::new(Error::MissingIdentifier)),
        }
    }

    /// The identifier as given, without surrounding whitespace
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// How this identifier is described in failure reasons
    pub(crate) fn describe(&self) -> String {
        format!("id {}", self.0)
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
