//! Feed fetcher trait definition and the HTTP implementation.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading the blog feed.
#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Blog feed is not configured")]
    NotConfigured,

    #[error("Failed to fetch blog feed: {0}")]
    Fetch(String),

    #[error("Blog feed answered with status {0}")]
    Status(u16),

    #[error("Failed to parse blog feed: {0}")]
    Parse(String),
}

impl BlogError {
    /// HTTP-style status code used when the error reaches a JSON client.
    pub fn code(&self) -> u16 {
        match self {
            BlogError::NotConfigured => 404,
            BlogError::Fetch(_) | BlogError::Status(_) | BlogError::Parse(_) => 502,
        }
    }
}

/// Source of the raw feed document.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self) -> Result<String, BlogError>;
}

pub struct HttpFeedFetcher {
    client: Client,
    url: String,
}

impl HttpFeedFetcher {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self) -> Result<String, BlogError> {
        debug!(url = %self.url, "Fetching blog feed");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| BlogError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BlogError::Status(response.status().as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| BlogError::Fetch(e.to_string()))
    }
}
