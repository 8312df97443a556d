//! Search API routes and the aggregated results page

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use crate::search::{AggregatedResults, Facet, SearchError, SearchResults, QUERY_PARAM};

use super::errors::log_error;
use super::state::{GuardedSearchProxy, ServerState};
use super::views;

type QueryParams = Query<Vec<(String, String)>>;

async fn search(
    State(proxy): State<GuardedSearchProxy>,
    Query(params): QueryParams,
) -> Result<Json<SearchResults>, SearchError> {
    Ok(Json(proxy.search(&params).await?))
}

async fn search_facet(
    State(proxy): State<GuardedSearchProxy>,
    Path(name): Path<String>,
    Query(params): QueryParams,
) -> Result<Json<Facet>, SearchError> {
    Ok(Json(proxy.facet(&name, &params).await?))
}

async fn search_all(
    State(proxy): State<GuardedSearchProxy>,
    Query(params): QueryParams,
) -> Result<Json<AggregatedResults>, SearchError> {
    Ok(Json(proxy.search_all(&params).await?))
}

fn raw_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .find(|(key, value)| key == QUERY_PARAM && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}

/// GET /search - HTML page with one section per configured source
async fn search_page(
    State(proxy): State<GuardedSearchProxy>,
    Query(params): QueryParams,
) -> Response {
    let query = raw_query(&params);
    if query.is_empty() {
        return Html(views::search_page("", None, &params, proxy.max_page())).into_response();
    }

    match proxy.search_all(&params).await {
        Ok(results) => Html(views::search_page(
            &query,
            Some(&results),
            &params,
            proxy.max_page(),
        ))
        .into_response(),
        Err(err) => {
            let body = err.to_body();
            log_error(body.code, &body.msg);
            let status =
                StatusCode::from_u16(body.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Html(views::search_error_page(&query, &body))).into_response()
        }
    }
}

pub fn make_search_api_routes(state: ServerState) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/search/all", get(search_all))
        .route("/search/facets/{name}", get(search_facet))
        .with_state(state)
}

pub fn make_search_page_routes(state: ServerState) -> Router {
    Router::new()
        .route("/search", get(search_page))
        .with_state(state)
}
