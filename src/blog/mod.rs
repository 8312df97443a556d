//! Blog feed aggregation: fetching, parsing and a TTL cache with pagination.

mod cache;
mod feed;
mod fetcher;
mod models;

pub use cache::BlogCache;
pub use feed::{parse_feed, summarize};
pub use fetcher::{BlogError, FeedFetcher, HttpFeedFetcher};
pub use models::{post_id, BlogPost};

use crate::config::BlogSettings;
use crate::http::create_client;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builds the blog cache when a feed URL is configured.
pub fn create_blog_cache(settings: &BlogSettings) -> Result<Option<BlogCache>> {
    let Some(url) = &settings.feed_url else {
        info!("No blog feed configured, blog routes disabled");
        return Ok(None);
    };
    info!(
        "Blog feed configured at {} (ttl {}s, {} per page)",
        url, settings.ttl_sec, settings.per_page
    );
    let fetcher = HttpFeedFetcher::new(create_client(settings.timeout_sec)?, url.clone());
    Ok(Some(BlogCache::new(
        Arc::new(fetcher),
        Duration::from_secs(settings.ttl_sec),
        settings.per_page,
        settings.summary_length,
    )))
}
