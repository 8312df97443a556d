//! Aquabrowser discovery backend.
//!
//! Talks to the `result.ashx` endpoint with `output=xml` and normalizes the
//! returned document:
//!
//! ```xml
//! <root>
//!   <meta><count>1</count></meta>
//!   <results>
//!     <record extID="123"><d><title>..</title><author>..</author></d></record>
//!   </results>
//!   <facets>
//!     <facet name="format"><value count="10">Book</value></facet>
//!   </facets>
//! </root>
//! ```

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use tracing::debug;

use super::backend::{SearchBackend, SearchError};
use super::models::{Api, Facet, FacetValue, SearchQuery, SearchRecord, SearchResults};
use crate::http::normalize_base_url;
use crate::xml;

pub struct AquabrowserBackend {
    client: Client,
    base_url: String,
    facets: Vec<String>,
}

impl AquabrowserBackend {
    pub fn new(client: Client, base_url: &str, facets: Vec<String>) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
            facets,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_params(query: &SearchQuery) -> Vec<(String, String)> {
        let mut params = vec![
            ("q".to_string(), query.query.clone()),
            ("page".to_string(), query.page.to_string()),
            ("pagesize".to_string(), query.page_size.to_string()),
            ("output".to_string(), "xml".to_string()),
        ];
        for (name, values) in &query.facets {
            for value in values {
                params.push((name.clone(), value.clone()));
            }
        }
        params
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<String, SearchError> {
        let url = format!("{}/result.ashx", self.base_url);
        let params = Self::request_params(query);
        debug!(url = %url, query = %query.query, page = query.page, "Querying Aquabrowser");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(Api::Aquabrowser, e))?;

        if !response.status().is_success() {
            return Err(SearchError::Upstream {
                api: Api::Aquabrowser,
                message: format!("status {}", response.status()),
            });
        }

        response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(Api::Aquabrowser, e))
    }
}

#[async_trait]
impl SearchBackend for AquabrowserBackend {
    fn api(&self) -> Api {
        Api::Aquabrowser
    }

    fn facet_fields(&self) -> &[String] {
        &self.facets
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        let body = self.fetch(query).await?;
        parse_results(&body, query)
    }

    async fn facet(&self, query: &SearchQuery, name: &str) -> Result<Facet, SearchError> {
        let body = self.fetch(query).await?;
        let results = parse_results(&body, query)?;
        Ok(results
            .facets
            .into_iter()
            .find(|facet| facet.name == name)
            .unwrap_or_else(|| Facet {
                name: name.to_string(),
                values: Vec::new(),
            }))
    }
}

fn invalid(message: impl Into<String>) -> SearchError {
    SearchError::InvalidResponse {
        api: Api::Aquabrowser,
        message: message.into(),
    }
}

fn apply_record_field(record: &mut SearchRecord, field: &str, value: String) {
    match field {
        "title" => {
            if record.title.is_empty() {
                record.title = value;
            } else {
                record.title.push(' ');
                record.title.push_str(&value);
            }
        }
        "author" => record.authors.push(value),
        "format" => record.format = Some(value),
        "year" => record.year = Some(value),
        "link" => record.link = Some(value),
        "coverimage" | "thumbnail" => record.thumbnail = Some(value),
        _ => {}
    }
}

/// Parses an Aquabrowser XML result document.
pub fn parse_results(body: &str, query: &SearchQuery) -> Result<SearchResults, SearchError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut results = SearchResults::empty(query);
    let mut stack: Vec<String> = Vec::new();
    let mut record: Option<SearchRecord> = None;
    let mut facet: Option<Facet> = None;
    let mut value_count: u64 = 0;
    let mut seen_document = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| invalid(format!("malformed XML: {}", e)))?;
        match event {
            Event::Start(e) => {
                let name = xml::start_name(&e);
                let parent = stack.last().map(String::as_str);
                match (parent, name.as_str()) {
                    (_, "meta") | (_, "results") => seen_document = true,
                    (Some("results"), "record") => {
                        record = Some(SearchRecord {
                            id: xml::attribute(&e, "extID")
                                .or_else(|| xml::attribute(&e, "id"))
                                .unwrap_or_default(),
                            ..Default::default()
                        });
                    }
                    (Some("facets"), "facet") => {
                        facet = Some(Facet {
                            name: xml::attribute(&e, "name").unwrap_or_default(),
                            values: Vec::new(),
                        });
                    }
                    (Some("facet"), "value") => {
                        value_count = xml::attribute(&e, "count")
                            .and_then(|c| c.trim().parse().ok())
                            .unwrap_or(0);
                    }
                    _ => {}
                }
                stack.push(name);
            }
            Event::End(e) => {
                let name = xml::end_name(&e);
                stack.pop();
                match name.as_str() {
                    "record" => {
                        if let Some(done) = record.take() {
                            results.records.push(done);
                        }
                    }
                    "facet" => {
                        if let Some(done) = facet.take() {
                            results.facets.push(done);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(e) => handle_text(
                &stack,
                xml::text(&e),
                &mut results,
                &mut record,
                &mut facet,
                value_count,
            )?,
            Event::CData(e) => handle_text(
                &stack,
                xml::cdata(e),
                &mut results,
                &mut record,
                &mut facet,
                value_count,
            )?,
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_document {
        return Err(invalid("document has neither meta nor results"));
    }
    if results.total == 0 {
        results.total = results.records.len() as u64;
    }
    Ok(results)
}

fn handle_text(
    stack: &[String],
    text: String,
    results: &mut SearchResults,
    record: &mut Option<SearchRecord>,
    facet: &mut Option<Facet>,
    value_count: u64,
) -> Result<(), SearchError> {
    let Some(current) = stack.last().map(String::as_str) else {
        return Ok(());
    };
    let parent = stack
        .len()
        .checked_sub(2)
        .map(|i| stack[i].as_str());

    match (parent, current) {
        (Some("meta"), "count") => {
            results.total = text
                .trim()
                .parse()
                .map_err(|_| invalid(format!("bad result count {:?}", text)))?;
        }
        (Some("facet"), "value") => {
            if let Some(facet) = facet.as_mut() {
                facet.values.push(FacetValue {
                    value: text,
                    count: value_count,
                });
            }
        }
        (Some("d"), field) => {
            if let Some(record) = record.as_mut() {
                apply_record_field(record, field, text);
            }
        }
        _ => {}
    }
    Ok(())
}
