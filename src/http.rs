//! Outbound HTTP client construction.

use anyhow::{Context, Result};
use std::time::Duration;

pub const USER_AGENT: &str = concat!("library-finder/", env!("CARGO_PKG_VERSION"));

/// Create a reqwest client shared by the search backends and the blog fetcher.
pub fn create_client(timeout_sec: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_sec))
        .build()
        .context("Failed to create HTTP client")
}

/// Strips any trailing slash so paths can be appended with `format!`.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
