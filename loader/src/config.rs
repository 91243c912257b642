//! API endpoint configuration
//!
//! Resolves the upstream base URL with the following priority:
//! 1. An explicit value (the viewer's `--base-url` flag)
//! 2. The `HOLOCRON_API_BASE_URL` environment variable
//! 3. [`DEFAULT_API_BASE_URL`]

use error_stack::Report;
use reqwest::Url;

use crate::constants::{API_BASE_URL_ENV_VAR, DEFAULT_API_BASE_URL, PEOPLE_PATH};
use crate::error::{Error, Result};
use crate::identifier::CharacterId;

/// Where the upstream resources live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Create a configuration for the given base URL
    ///
    /// Trailing slashes are dropped so paths can be joined with a single `/`.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');

        let url = Url::parse(trimmed).map_err(|e| {
            Report::new(Error::invalid("API base URL", e)).attach(format!("Value: {base_url}"))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Report::new(Error::invalid(
                "API base URL",
                format!("unsupported scheme '{}'", url.scheme()),
            )));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Resolve the configuration from an explicit value, the environment, or the default
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        let from_env = std::env::var(API_BASE_URL_ENV_VAR).ok();
        Self::resolve_with(explicit, from_env.as_deref())
    }

    fn resolve_with(explicit: Option<&str>, from_env: Option<&str>) -> Result<Self> {
        match explicit.or(from_env).filter(|value| !value.trim().is_empty()) {
            Some(base_url) => Self::new(base_url),
            None => Ok(Self::default()),
        }
    }

    /// The normalised base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a single character record
    pub fn character_url(&self, id: &CharacterId) -> String {
        format!("{}/{PEOPLE_PATH}/{id}/", self.base_url)
    }

    /// URL of the first page of the character listing
    pub fn catalog_url(&self) -> String {
        format!("{}/{PEOPLE_PATH}/", self.base_url)
    }
}
