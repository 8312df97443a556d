//! Summon discovery backend.
//!
//! Every request is signed with the Summon HMAC-SHA1 scheme: the digest covers
//! the accept header, the request date, the host, the path and the sorted,
//! unencoded query string.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use serde::Deserialize;
use sha1::Sha1;
use tracing::debug;

use super::backend::{SearchBackend, SearchError};
use super::models::{Api, Facet, FacetValue, SearchQuery, SearchRecord, SearchResults};
use crate::http::normalize_base_url;

type HmacSha1 = Hmac<Sha1>;

const SEARCH_PATH: &str = "/2.0.0/search";
const ACCEPT_JSON: &str = "application/json";
/// Facet values requested per field alongside ordinary searches.
const INLINE_FACET_LIMIT: usize = 10;

pub struct SummonBackend {
    client: Client,
    base_url: String,
    host: String,
    path: String,
    access_id: String,
    secret_key: String,
    facets: Vec<String>,
    facet_limit: usize,
}

impl SummonBackend {
    pub fn new(
        client: Client,
        base_url: &str,
        access_id: String,
        secret_key: String,
        facets: Vec<String>,
        facet_limit: usize,
    ) -> Result<Self> {
        let base_url = normalize_base_url(base_url);
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("Invalid Summon base URL: {}", base_url))?;
        let host = match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(anyhow!("Summon base URL has no host: {}", base_url)),
        };
        let path = format!("{}{}", parsed.path().trim_end_matches('/'), SEARCH_PATH);

        Ok(Self {
            client,
            base_url,
            host,
            path,
            access_id,
            secret_key,
            facets,
            facet_limit,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn base_params(query: &SearchQuery) -> Vec<(String, String)> {
        let mut params = vec![
            ("s.q".to_string(), query.query.clone()),
            ("s.pn".to_string(), query.page.to_string()),
            ("s.ps".to_string(), query.page_size.to_string()),
            ("s.hl".to_string(), "false".to_string()),
        ];
        for (name, values) in &query.facets {
            for value in values {
                params.push((
                    "s.fvf".to_string(),
                    format!("{},{},false", name, escape_filter_value(value)),
                ));
            }
        }
        params
    }

    fn facet_field_param(name: &str, limit: usize) -> (String, String) {
        ("s.ff".to_string(), format!("{},or,1,{}", name, limit))
    }

    async fn execute(&self, params: Vec<(String, String)>) -> Result<SummonResponse, SearchError> {
        let date = chrono::Utc::now()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string();
        let digest = summon_digest(
            &self.secret_key,
            ACCEPT_JSON,
            &date,
            &self.host,
            &self.path,
            &params,
        )?;

        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        debug!(url = %url, params = params.len(), "Querying Summon");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header(ACCEPT, ACCEPT_JSON)
            .header("x-summon-date", &date)
            .header(
                AUTHORIZATION,
                format!("Summon {};{}", self.access_id, digest),
            )
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(Api::Summon, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .json::<SummonErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.error_message());
            return Err(SearchError::Upstream {
                api: Api::Summon,
                message: match detail {
                    Some(detail) => format!("status {}: {}", status, detail),
                    None => format!("status {}", status),
                },
            });
        }

        response
            .json::<SummonResponse>()
            .await
            .map_err(|e| SearchError::InvalidResponse {
                api: Api::Summon,
                message: e.to_string(),
            })
    }
}

/// Backslash-escapes the characters Summon treats as separators in filter values.
fn escape_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | ',' | ':') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Computes the base64 HMAC-SHA1 digest Summon expects in the
/// `Authorization` header.
pub fn summon_digest(
    secret_key: &str,
    accept: &str,
    date: &str,
    host: &str,
    path: &str,
    params: &[(String, String)],
) -> Result<String, SearchError> {
    let mut pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    pairs.sort();
    let id_string = format!(
        "{}\n{}\n{}\n{}\n{}\n",
        accept,
        date,
        host,
        path,
        pairs.join("&")
    );

    let mut mac =
        HmacSha1::new_from_slice(secret_key.as_bytes()).map_err(|e| SearchError::Upstream {
            api: Api::Summon,
            message: format!("cannot sign request: {}", e),
        })?;
    mac.update(id_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[async_trait]
impl SearchBackend for SummonBackend {
    fn api(&self) -> Api {
        Api::Summon
    }

    fn facet_fields(&self) -> &[String] {
        &self.facets
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        let mut params = Self::base_params(query);
        for name in &self.facets {
            params.push(Self::facet_field_param(name, INLINE_FACET_LIMIT));
        }
        let response = self.execute(params).await?;
        Ok(response.into_results(query))
    }

    async fn facet(&self, query: &SearchQuery, name: &str) -> Result<Facet, SearchError> {
        let mut params = Self::base_params(query);
        params.push(Self::facet_field_param(name, self.facet_limit));
        let response = self.execute(params).await?;
        Ok(response
            .into_results(query)
            .facets
            .into_iter()
            .find(|facet| facet.name == name)
            .unwrap_or_else(|| Facet {
                name: name.to_string(),
                values: Vec::new(),
            }))
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummonResponse {
    #[serde(default)]
    record_count: u64,
    #[serde(default)]
    documents: Vec<SummonDocument>,
    #[serde(default)]
    facet_fields: Vec<SummonFacetField>,
}

#[derive(Debug, Deserialize)]
struct SummonDocument {
    #[serde(rename = "ID", default)]
    id: Vec<String>,
    #[serde(rename = "Title", default)]
    title: Vec<String>,
    #[serde(rename = "Subtitle", default)]
    subtitle: Vec<String>,
    #[serde(rename = "Author", default)]
    author: Vec<String>,
    #[serde(rename = "ContentType", default)]
    content_type: Vec<String>,
    #[serde(rename = "PublicationYear", default)]
    publication_year: Vec<String>,
    #[serde(rename = "PublicationDate", default)]
    publication_date: Vec<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    thumbnail_m: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummonFacetField {
    display_name: String,
    #[serde(default)]
    counts: Vec<SummonFacetCount>,
}

#[derive(Debug, Deserialize)]
struct SummonFacetCount {
    value: String,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct SummonErrorResponse {
    #[serde(default)]
    errors: Vec<SummonErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct SummonErrorEntry {
    #[serde(default)]
    message: String,
}

impl SummonErrorResponse {
    fn error_message(self) -> Option<String> {
        self.errors
            .into_iter()
            .map(|e| e.message)
            .find(|m| !m.is_empty())
    }
}

impl SummonDocument {
    fn into_record(self) -> SearchRecord {
        let mut title = self.title.into_iter().next().unwrap_or_default();
        if let Some(subtitle) = self.subtitle.into_iter().next() {
            title = format!("{}: {}", title, subtitle);
        }
        SearchRecord {
            id: self.id.into_iter().next().unwrap_or_default(),
            title,
            authors: self.author,
            format: self.content_type.into_iter().next(),
            year: self
                .publication_year
                .into_iter()
                .next()
                .or_else(|| self.publication_date.into_iter().next()),
            link: self.link,
            thumbnail: self.thumbnail_m.into_iter().next(),
        }
    }
}

impl SummonResponse {
    fn into_results(self, query: &SearchQuery) -> SearchResults {
        SearchResults {
            api: Api::Summon,
            query: query.query.clone(),
            page: query.page,
            page_size: query.page_size,
            total: self.record_count,
            records: self
                .documents
                .into_iter()
                .map(SummonDocument::into_record)
                .collect(),
            facets: self
                .facet_fields
                .into_iter()
                .map(|field| Facet {
                    name: field.display_name,
                    values: field
                        .counts
                        .into_iter()
                        .map(|c| FacetValue {
                            value: c.value,
                            count: c.count,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
