//! Normalized search types shared by every backend

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::SearchError;

/// The discovery API a query is dispatched to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Api {
    Aquabrowser,
    Summon,
}

impl Api {
    pub const ALL: [Api; 2] = [Api::Aquabrowser, Api::Summon];

    pub fn as_str(&self) -> &'static str {
        match self {
            Api::Aquabrowser => "aquabrowser",
            Api::Summon => "summon",
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Api {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aquabrowser" => Ok(Api::Aquabrowser),
            "summon" => Ok(Api::Summon),
            _ => Err(SearchError::InvalidApi(s.to_string())),
        }
    }
}

/// A validated query, ready to be sent to a backend.
///
/// Only whitelisted facet keys ever make it into `facets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub api: Api,
    pub query: String,
    pub page: usize,
    pub page_size: usize,
    pub facets: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub format: Option<String>,
    pub year: Option<String>,
    pub link: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetValue {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub name: String,
    pub values: Vec<FacetValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub api: Api,
    pub query: String,
    pub page: usize,
    pub page_size: usize,
    pub total: u64,
    pub records: Vec<SearchRecord>,
    pub facets: Vec<Facet>,
}

impl SearchResults {
    pub fn empty(query: &SearchQuery) -> Self {
        SearchResults {
            api: query.api,
            query: query.query.clone(),
            page: query.page,
            page_size: query.page_size,
            total: 0,
            records: Vec::new(),
            facets: Vec::new(),
        }
    }

    pub fn total_pages(&self) -> usize {
        crate::paging::total_pages(self.total as usize, self.page_size)
    }
}

/// The uniform error object returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub msg: String,
}

/// Outcome of one backend within an aggregated search.
#[derive(Debug, Clone, Serialize)]
pub struct BackendSection {
    pub api: Api,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<SearchResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregatedResults {
    pub query: String,
    pub page: usize,
    pub sections: Vec<BackendSection>,
}
