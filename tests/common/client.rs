//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server route.
//! When routes or query formats change, update only this file.
#![allow(dead_code)]

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get_with_query(&self, path: &str, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Status
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.get_with_query("/", &[]).await
    }

    pub async fn get_status(&self) -> Response {
        self.get_with_query("/api/status", &[]).await
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// GET /api/search with raw query parameters
    pub async fn search(&self, params: &[(&str, &str)]) -> Response {
        self.get_with_query("/api/search", params).await
    }

    pub async fn search_facet(&self, name: &str, params: &[(&str, &str)]) -> Response {
        self.get_with_query(&format!("/api/search/facets/{}", name), params)
            .await
    }

    pub async fn search_all(&self, params: &[(&str, &str)]) -> Response {
        self.get_with_query("/api/search/all", params).await
    }

    /// GET /search (HTML)
    pub async fn search_page(&self, params: &[(&str, &str)]) -> Response {
        self.get_with_query("/search", params).await
    }

    // ========================================================================
    // Blog
    // ========================================================================

    pub async fn get_blog(&self, page: Option<&str>) -> Response {
        match page {
            Some(page) => self.get_with_query("/api/blog", &[("page", page)]).await,
            None => self.get_with_query("/api/blog", &[]).await,
        }
    }

    pub async fn get_blog_post(&self, id: &str) -> Response {
        self.get_with_query(&format!("/api/blog/{}", id), &[]).await
    }

    /// GET /blog (HTML)
    pub async fn get_blog_page(&self, page: Option<&str>) -> Response {
        match page {
            Some(page) => self.get_with_query("/blog", &[("page", page)]).await,
            None => self.get_with_query("/blog", &[]).await,
        }
    }

    /// GET /blog/{id} (HTML)
    pub async fn get_blog_post_page(&self, id: &str) -> Response {
        self.get_with_query(&format!("/blog/{}", id), &[]).await
    }

    // ========================================================================
    // Libraries
    // ========================================================================

    pub async fn get_libraries(&self) -> Response {
        self.get_with_query("/api/libraries", &[]).await
    }

    pub async fn get_libraries_near(&self, lat: &str, lng: &str) -> Response {
        self.get_with_query("/api/libraries", &[("lat", lat), ("lng", lng)])
            .await
    }

    pub async fn get_library(&self, id: &str) -> Response {
        self.get_with_query(&format!("/api/libraries/{}", id), &[])
            .await
    }
}
