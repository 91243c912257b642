//! Shared HTTP client with connection pooling
//!
//! This module provides a singleton HTTP client that reuses connections
//! across the character, homeworld and listing requests.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;

use crate::constants::{CONNECTION_TIMEOUT, POOL_IDLE_TIMEOUT, POOL_MAX_IDLE_PER_HOST};

/// Shared HTTP client instance with connection pooling
///
/// Only the connect phase has a timeout. A stalled upstream leaves the load pending
/// until a newer load supersedes it.
static HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .connect_timeout(Duration::from_secs(CONNECTION_TIMEOUT))
        .user_agent(concat!("holocron/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Get the shared HTTP client instance
pub fn get_client() -> &'static Client {
    &HTTP_CLIENT
}
