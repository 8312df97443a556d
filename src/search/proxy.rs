//! Dispatches validated queries to the configured discovery backends.

use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::backend::{SearchBackend, SearchError};
use super::models::{AggregatedResults, Api, BackendSection, Facet, SearchQuery, SearchResults};
use super::query::{select_api, QueryLimits};

pub struct SearchProxy {
    backends: BTreeMap<Api, Arc<dyn SearchBackend>>,
    default_api: Api,
    limits: QueryLimits,
}

impl SearchProxy {
    pub fn new(default_api: Api, limits: QueryLimits) -> Self {
        Self {
            backends: BTreeMap::new(),
            default_api,
            limits,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn SearchBackend>) -> Self {
        self.backends.insert(backend.api(), backend);
        self
    }

    /// APIs with a configured backend, in declaration order.
    pub fn enabled_apis(&self) -> Vec<Api> {
        self.backends.keys().copied().collect()
    }

    pub fn default_api(&self) -> Api {
        self.default_api
    }

    /// Highest page a query can reach; larger page numbers are clamped to it.
    pub fn max_page(&self) -> usize {
        self.limits.max_page
    }

    fn backend(&self, api: Api) -> Result<&Arc<dyn SearchBackend>, SearchError> {
        self.backends
            .get(&api)
            .ok_or(SearchError::BackendUnavailable(api))
    }

    fn build_query(
        &self,
        params: &[(String, String)],
    ) -> Result<(&Arc<dyn SearchBackend>, SearchQuery), SearchError> {
        let api = select_api(params, self.default_api)?;
        let backend = self.backend(api)?;
        let query = SearchQuery::from_params(params, api, backend.facet_fields(), self.limits)?;
        Ok((backend, query))
    }

    pub async fn search(&self, params: &[(String, String)]) -> Result<SearchResults, SearchError> {
        let (backend, query) = self.build_query(params)?;
        debug!(
            "Dispatching search {:?} (page {}) to {}",
            query.query, query.page, query.api
        );
        backend.search(&query).await
    }

    pub async fn facet(
        &self,
        name: &str,
        params: &[(String, String)],
    ) -> Result<Facet, SearchError> {
        let (backend, query) = self.build_query(params)?;
        let name = name.trim();
        if name.is_empty() || !backend.facet_fields().iter().any(|f| f == name) {
            return Err(SearchError::MissingFacet(name.to_string()));
        }
        backend.facet(&query, name).await
    }

    /// Runs the query against every configured backend concurrently.
    ///
    /// The `api` flag is ignored. Each backend applies its own facet
    /// whitelist, and a failing backend only affects its own section.
    pub async fn search_all(
        &self,
        params: &[(String, String)],
    ) -> Result<AggregatedResults, SearchError> {
        let mut queries = Vec::with_capacity(self.backends.len());
        for (api, backend) in &self.backends {
            let query =
                SearchQuery::from_params(params, *api, backend.facet_fields(), self.limits)?;
            queries.push((backend.clone(), query));
        }

        // With no backend configured there is still a query to validate.
        let (query_text, page) = match queries.first() {
            Some((_, q)) => (q.query.clone(), q.page),
            None => {
                let q =
                    SearchQuery::from_params(params, self.default_api, &[], self.limits)?;
                (q.query, q.page)
            }
        };

        let sections = join_all(queries.into_iter().map(|(backend, query)| async move {
            match backend.search(&query).await {
                Ok(results) => BackendSection {
                    api: query.api,
                    results: Some(results),
                    error: None,
                },
                Err(err) => {
                    warn!("Aggregated search on {} failed: {}", query.api, err);
                    BackendSection {
                        api: query.api,
                        results: None,
                        error: Some(err.to_body()),
                    }
                }
            }
        }))
        .await;

        Ok(AggregatedResults {
            query: query_text,
            page,
            sections,
        })
    }
}
