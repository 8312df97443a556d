//! Query parameter whitelisting and validation

use std::collections::BTreeMap;
use tracing::debug;

use super::models::{Api, SearchQuery};
use super::SearchError;
use crate::paging::clamp_page;

pub const QUERY_PARAM: &str = "q";
pub const API_PARAM: &str = "api";
pub const PAGE_PARAM: &str = "page";

const BASE_PARAMS: [&str; 3] = [QUERY_PARAM, API_PARAM, PAGE_PARAM];

/// Drops every parameter that is neither a base parameter nor an allowed facet.
///
/// Values are trimmed and blank values are removed. Order is preserved.
pub fn sanitize_params(
    params: &[(String, String)],
    allowed_facets: &[String],
) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let allowed = BASE_PARAMS.contains(&key.as_str())
                || allowed_facets.iter().any(|facet| facet == key);
            if !allowed {
                debug!("Stripping non-whitelisted search parameter {:?}", key);
                return None;
            }
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            Some((key.clone(), value.to_string()))
        })
        .collect()
}

fn first_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, v)| k == key && !v.trim().is_empty())
        .map(|(_, v)| v.trim())
}

/// Picks the API named by the `api` flag, or `default` when it is absent.
pub fn select_api(params: &[(String, String)], default: Api) -> Result<Api, SearchError> {
    match first_value(params, API_PARAM) {
        Some(name) => name.parse(),
        None => Ok(default),
    }
}

/// Limits applied while building a [`SearchQuery`].
#[derive(Debug, Clone, Copy)]
pub struct QueryLimits {
    pub page_size: usize,
    pub max_page: usize,
}

impl SearchQuery {
    /// Builds a validated query for `api` from raw request parameters.
    pub fn from_params(
        params: &[(String, String)],
        api: Api,
        allowed_facets: &[String],
        limits: QueryLimits,
    ) -> Result<SearchQuery, SearchError> {
        let sanitized = sanitize_params(params, allowed_facets);

        let query = first_value(&sanitized, QUERY_PARAM)
            .ok_or(SearchError::MissingQuery)?
            .to_string();
        let page = clamp_page(first_value(&sanitized, PAGE_PARAM), limits.max_page);

        let mut facets: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in sanitized {
            if BASE_PARAMS.contains(&key.as_str()) {
                continue;
            }
            let values = facets.entry(key).or_default();
            if !values.contains(&value) {
                values.push(value);
            }
        }

        Ok(SearchQuery {
            api,
            query,
            page,
            page_size: limits.page_size,
            facets,
        })
    }
}
