//! Shared constants for end-to-end tests
//!
//! When fixture data changes (library ids, upstream paths, credentials),
//! update only this file.
#![allow(dead_code)]

// ============================================================================
// Upstream mock paths
// ============================================================================

/// Aquabrowser base path on the upstream mock server
pub const AQUABROWSER_BASE_PATH: &str = "/aqua";

/// Summon base path on the upstream mock server
pub const SUMMON_BASE_PATH: &str = "/summon";

/// Blog feed path on the upstream mock server
pub const BLOG_FEED_PATH: &str = "/news/feed.xml";

// ============================================================================
// Summon credentials
// ============================================================================

pub const SUMMON_ACCESS_ID: &str = "test-library";

pub const SUMMON_SECRET_KEY: &str = "test-secret";

// ============================================================================
// Fixture data
// ============================================================================

/// Library in the city centre, first in the libraries file
pub const LIBRARY_CITY_ID: &str = "ub-city";

/// Library at the science park, second in the libraries file
pub const LIBRARY_SCIENCE_PARK_ID: &str = "science-park";

/// Library in Utrecht, last in the libraries file
pub const LIBRARY_UTRECHT_ID: &str = "utrecht";

/// Number of entries in the fixture blog feed
pub const BLOG_POST_COUNT: usize = 7;

/// Posts per blog page used by the test server
pub const BLOG_PER_PAGE: usize = 3;

/// Results per search page used by the test server
pub const SEARCH_PAGE_SIZE: usize = 10;

/// Highest search page used by the test server
pub const SEARCH_MAX_PAGE: usize = 5;

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Upstream timeout configured for the search backends and the feed (seconds)
pub const UPSTREAM_TIMEOUT_SECS: u64 = 2;
