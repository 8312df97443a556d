//! Search backend trait definition.

use super::models::{Api, ErrorBody, Facet, SearchQuery, SearchResults};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while validating or executing a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid API: {0}")]
    InvalidApi(String),

    #[error("Missing query")]
    MissingQuery,

    #[error("Missing facet: {0}")]
    MissingFacet(String),

    #[error("API not configured: {0}")]
    BackendUnavailable(Api),

    #[error("Upstream error from {api}: {message}")]
    Upstream { api: Api, message: String },

    #[error("Request to {0} timed out")]
    Timeout(Api),

    #[error("Invalid response from {api}: {message}")]
    InvalidResponse { api: Api, message: String },
}

impl SearchError {
    /// HTTP-style status code carried in the error body.
    pub fn code(&self) -> u16 {
        match self {
            SearchError::InvalidApi(_) | SearchError::MissingQuery => 400,
            SearchError::MissingFacet(_) => 404,
            SearchError::Upstream { .. } | SearchError::InvalidResponse { .. } => 502,
            SearchError::BackendUnavailable(_) => 503,
            SearchError::Timeout(_) => 504,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            msg: self.to_string(),
        }
    }

    /// Maps a transport error from reqwest into a search error for `api`.
    pub(crate) fn from_reqwest(api: Api, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout(api)
        } else if err.is_decode() {
            SearchError::InvalidResponse {
                api,
                message: err.to_string(),
            }
        } else {
            SearchError::Upstream {
                api,
                message: err.to_string(),
            }
        }
    }
}

/// A discovery service the proxy can dispatch queries to.
///
/// Implementations translate a [`SearchQuery`] into the vendor's wire format
/// and normalize the vendor's answer back into [`SearchResults`].
#[async_trait]
pub trait SearchBackend: Send + Sync {
    fn api(&self) -> Api;

    /// Facet keys clients may pass through to this backend.
    fn facet_fields(&self) -> &[String];

    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, SearchError>;

    /// Fetch the values of a single facet for `query`.
    ///
    /// `name` has already been checked against [`SearchBackend::facet_fields`].
    async fn facet(&self, query: &SearchQuery, name: &str) -> Result<Facet, SearchError>;
}
