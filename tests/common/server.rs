//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own upstream mock server
//! standing in for Aquabrowser, Summon and the blog feed.

use super::constants::*;
use super::fixtures::create_libraries_file;
use httpmock::MockServer;
use library_finder::config::{AquabrowserSettings, BlogSettings, SearchSettings, SummonSettings};
use library_finder::search::Api;
use library_finder::server::{make_app, RequestsLoggingLevel, ServerConfig};
use library_finder::{create_blog_cache, create_search_proxy, LibraryDirectory};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;

/// Which parts of the server are configured
pub struct TestServerOptions {
    pub aquabrowser: bool,
    pub summon: bool,
    pub blog: bool,
    pub blog_ttl_sec: u64,
    pub frontend_dir_path: Option<String>,
}

impl Default for TestServerOptions {
    fn default() -> Self {
        Self {
            aquabrowser: true,
            summon: true,
            blog: true,
            blog_ttl_sec: 3600,
            frontend_dir_path: None,
        }
    }
}

/// Test server instance with its own upstream mock server
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Mock server the search backends and the feed fetcher talk to
    pub upstream: MockServer,

    // Private fields - keep resources alive until drop
    _libraries_file: NamedTempFile,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a fully configured test server on a random port
    pub async fn spawn() -> Self {
        Self::spawn_with(TestServerOptions::default()).await
    }

    /// Spawns a test server on a random port
    ///
    /// This function:
    /// 1. Starts an upstream mock server
    /// 2. Writes the libraries fixture to a temp file
    /// 3. Builds the search proxy and blog cache against the mock server
    /// 4. Binds to a random port (127.0.0.1:0)
    /// 5. Spawns the server in a background task
    /// 6. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if any of those steps fails.
    pub async fn spawn_with(options: TestServerOptions) -> Self {
        let upstream = MockServer::start_async().await;

        let libraries_file = create_libraries_file().expect("Failed to write libraries file");
        let libraries =
            LibraryDirectory::load(libraries_file.path()).expect("Failed to load libraries");

        let search_settings = SearchSettings {
            default_api: Api::Summon,
            page_size: SEARCH_PAGE_SIZE,
            max_page: SEARCH_MAX_PAGE,
            timeout_sec: UPSTREAM_TIMEOUT_SECS,
            facet_limit: 50,
            aquabrowser: options.aquabrowser.then(|| AquabrowserSettings {
                base_url: upstream.url(AQUABROWSER_BASE_PATH),
                facets: vec!["format".to_string(), "language".to_string()],
            }),
            summon: options.summon.then(|| SummonSettings {
                base_url: upstream.url(SUMMON_BASE_PATH),
                access_id: SUMMON_ACCESS_ID.to_string(),
                secret_key: SUMMON_SECRET_KEY.to_string(),
                facets: vec!["ContentType".to_string(), "Language".to_string()],
            }),
        };
        let search_proxy =
            Arc::new(create_search_proxy(&search_settings).expect("Failed to build search proxy"));

        let blog_settings = BlogSettings {
            feed_url: options.blog.then(|| upstream.url(BLOG_FEED_PATH)),
            ttl_sec: options.blog_ttl_sec,
            per_page: BLOG_PER_PAGE,
            summary_length: 200,
            timeout_sec: UPSTREAM_TIMEOUT_SECS,
        };
        let blog = create_blog_cache(&blog_settings)
            .expect("Failed to build blog cache")
            .map(Arc::new);

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            content_cache_age_sec: 60,
            frontend_dir_path: options.frontend_dir_path,
        };

        let app = make_app(config, search_proxy, blog, Arc::new(libraries))
            .expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            upstream,
            _libraries_file: libraries_file,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the status endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client
                .get(format!("{}/api/status", self.base_url))
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
