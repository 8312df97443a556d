use anyhow::{Context, Result};
use std::{sync::Arc, time::Duration};

use tracing::info;

use crate::blog::BlogCache;
use crate::libraries::LibraryDirectory;
use crate::search::{Api, SearchProxy};
use tower_http::services::ServeDir;

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::blog::{make_blog_api_routes, make_blog_page_routes};
use super::libraries::make_libraries_routes;
use super::search::{make_search_api_routes, make_search_page_routes};
use super::{http_cache, log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub version: String,
    pub search_apis: Vec<Api>,
    pub default_search_api: Api,
    pub blog_enabled: bool,
    pub libraries: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        search_apis: state.search_proxy.enabled_apis(),
        default_search_api: state.search_proxy.default_api(),
        blog_enabled: state.blog.is_some(),
        libraries: state.libraries.len(),
    };
    Json(stats)
}

pub fn make_app(
    config: ServerConfig,
    search_proxy: Arc<SearchProxy>,
    blog: Option<Arc<BlogCache>>,
    libraries: Arc<LibraryDirectory>,
) -> Result<Router> {
    let state = ServerState::new(config.clone(), search_proxy, blog, libraries);

    let libraries_routes: Router = make_libraries_routes(state.clone()).layer(
        middleware::from_fn_with_state(config.content_cache_age_sec, http_cache),
    );

    let api_routes: Router = Router::new()
        .route("/status", get(home))
        .with_state(state.clone())
        .merge(make_search_api_routes(state.clone()))
        .merge(make_blog_api_routes(state.clone()))
        .merge(libraries_routes);

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let app: Router = home_router
        .nest("/api", api_routes)
        .merge(make_search_page_routes(state.clone()))
        .merge(make_blog_page_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    config: ServerConfig,
    search_proxy: Arc<SearchProxy>,
    blog: Option<Arc<BlogCache>>,
    libraries: Arc<LibraryDirectory>,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, search_proxy, blog, libraries)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
