//! Constants for the upstream API, HTTP pooling and user-facing text

// ============================================================================
// UPSTREAM API CONSTANTS
// ============================================================================

/// Default base URL of the upstream character API
pub const DEFAULT_API_BASE_URL: &str = "https://swapi.dev/api";

/// Environment variable that overrides the API base URL
pub const API_BASE_URL_ENV_VAR: &str = "HOLOCRON_API_BASE_URL";

/// Collection path for character records
pub const PEOPLE_PATH: &str = "people";

// ============================================================================
// NETWORK CONSTANTS
// ============================================================================

/// Idle timeout for connection pool in seconds
pub const POOL_IDLE_TIMEOUT: u64 = 300;

/// Maximum idle connections per host
pub const POOL_MAX_IDLE_PER_HOST: usize = 5;

/// Connection timeout in seconds
///
/// Only the connect phase is bounded. A request that connects and then stalls stays pending.
pub const CONNECTION_TIMEOUT: u64 = 30;

// ============================================================================
// MESSAGE CONSTANTS
// ============================================================================

/// Fallback reason for faults that are neither rejections nor connectivity problems
pub const MSG_UNEXPECTED_FAILURE: &str = "unexpected error occurred while loading character data";

/// Fallback reason for unexpected faults while loading the listing
pub const MSG_UNEXPECTED_CATALOG_FAILURE: &str =
    "unexpected error occurred while loading the character listing";
