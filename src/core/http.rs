//! HTTP client construction.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::error::{ChatlineError, Result};

/// Default timeout for completion requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("chatline/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ChatlineError::Network(e.to_string()))
}

/// Get or create a default HTTP client.
pub fn default_client() -> Result<Client> {
    build_client(DEFAULT_TIMEOUT)
}
