//! Blog routes: HTML pages and the JSON feed

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::error;

use crate::blog::{BlogError, BlogPost};
use crate::paging::Page;
use crate::search::ErrorBody;

use super::state::{OptionalBlogCache, ServerState};
use super::views;

#[derive(Deserialize, Default)]
struct PageQuery {
    page: Option<String>,
}

fn html_error(status: StatusCode, message: &str) -> Response {
    (status, Html(views::error_page(status, message))).into_response()
}

fn html_failure(err: BlogError) -> Response {
    if matches!(err, BlogError::NotConfigured) {
        return html_error(StatusCode::NOT_FOUND, "The news feed is not available.");
    }
    error!("Failed to load blog feed: {}", err);
    html_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "The news feed could not be loaded. Please try again later.",
    )
}

/// GET /blog?page=N
async fn blog_index(
    State(blog): State<OptionalBlogCache>,
    Query(query): Query<PageQuery>,
) -> Response {
    let Some(blog) = blog else {
        return html_failure(BlogError::NotConfigured);
    };
    match blog.page(query.page.as_deref()).await {
        Ok(page) => Html(views::blog_page(&page)).into_response(),
        Err(err) => html_failure(err),
    }
}

/// GET /blog/{id}
async fn blog_post(State(blog): State<OptionalBlogCache>, Path(id): Path<String>) -> Response {
    let Some(blog) = blog else {
        return html_failure(BlogError::NotConfigured);
    };
    match blog.find(&id).await {
        Ok(Some(post)) => Html(views::blog_post(&post)).into_response(),
        Ok(None) => html_error(StatusCode::NOT_FOUND, "This post does not exist."),
        Err(err) => html_failure(err),
    }
}

/// GET /api/blog?page=N
async fn api_blog_index(
    State(blog): State<OptionalBlogCache>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<BlogPost>>, BlogError> {
    let blog = blog.ok_or(BlogError::NotConfigured)?;
    Ok(Json(blog.page(query.page.as_deref()).await?))
}

/// GET /api/blog/{id}
async fn api_blog_post(
    State(blog): State<OptionalBlogCache>,
    Path(id): Path<String>,
) -> Response {
    let Some(blog) = blog else {
        return BlogError::NotConfigured.into_response();
    };
    match blog.find(&id).await {
        Ok(Some(post)) => Json(post).into_response(),
        Ok(None) => ErrorBody {
            code: 404,
            msg: format!("Post not found: {}", id),
        }
        .into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn make_blog_api_routes(state: ServerState) -> Router {
    Router::new()
        .route("/blog", get(api_blog_index))
        .route("/blog/{id}", get(api_blog_post))
        .with_state(state)
}

pub fn make_blog_page_routes(state: ServerState) -> Router {
    Router::new()
        .route("/blog", get(blog_index))
        .route("/blog/{id}", get(blog_post))
        .with_state(state)
}
