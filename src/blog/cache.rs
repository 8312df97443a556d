//! Time-to-live cache over the parsed blog feed.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

use super::feed::parse_feed;
use super::fetcher::{BlogError, FeedFetcher};
use super::models::BlogPost;
use crate::paging::{paginate, Page};

struct CachedFeed {
    fetched_at: Instant,
    posts: Arc<Vec<BlogPost>>,
}

/// Holds the last successfully parsed feed and refetches it once it is older
/// than the configured TTL.
///
/// The lock is held across a refresh, so concurrent requests that find the
/// cache expired wait for a single fetch instead of each starting their own.
pub struct BlogCache {
    fetcher: Arc<dyn FeedFetcher>,
    ttl: Duration,
    per_page: usize,
    summary_length: usize,
    state: Mutex<Option<CachedFeed>>,
}

impl BlogCache {
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        ttl: Duration,
        per_page: usize,
        summary_length: usize,
    ) -> Self {
        Self {
            fetcher,
            ttl,
            per_page,
            summary_length,
            state: Mutex::new(None),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    async fn refresh(&self) -> Result<Vec<BlogPost>, BlogError> {
        let body = self.fetcher.fetch().await?;
        parse_feed(&body, self.summary_length)
    }

    /// Returns the cached posts, refreshing them first when expired.
    ///
    /// A failed refresh falls back to stale posts when there are any.
    pub async fn entries(&self) -> Result<Arc<Vec<BlogPost>>, BlogError> {
        let mut state = self.state.lock().await;

        if let Some(cached) = state.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(cached.posts.clone());
            }
        }

        match self.refresh().await {
            Ok(posts) => {
                info!("Blog feed refreshed with {} posts", posts.len());
                let posts = Arc::new(posts);
                *state = Some(CachedFeed {
                    fetched_at: Instant::now(),
                    posts: posts.clone(),
                });
                Ok(posts)
            }
            Err(err) => match state.as_ref() {
                Some(stale) => {
                    warn!("Blog feed refresh failed, serving stale posts: {}", err);
                    Ok(stale.posts.clone())
                }
                None => Err(err),
            },
        }
    }

    pub async fn page(&self, raw_page: Option<&str>) -> Result<Page<BlogPost>, BlogError> {
        let posts = self.entries().await?;
        Ok(paginate(&posts, raw_page, self.per_page))
    }

    pub async fn find(&self, id: &str) -> Result<Option<BlogPost>, BlogError> {
        let posts = self.entries().await?;
        Ok(posts.iter().find(|post| post.id == id).cloned())
    }
}
