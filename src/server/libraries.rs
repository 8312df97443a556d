//! Library directory routes

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::libraries::Coordinates;
use crate::search::ErrorBody;

use super::state::{GuardedLibraryDirectory, ServerState};

#[derive(Deserialize, Default)]
struct NearQuery {
    lat: Option<String>,
    lng: Option<String>,
}

fn bad_request(msg: impl Into<String>) -> ErrorBody {
    ErrorBody {
        code: 400,
        msg: msg.into(),
    }
}

/// Both coordinates or neither; anything else is a client error.
fn parse_near(query: &NearQuery) -> Result<Option<Coordinates>, ErrorBody> {
    let lat = query.lat.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let lng = query.lng.as_deref().map(str::trim).filter(|s| !s.is_empty());
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            let (Ok(lat), Ok(lng)) = (lat.parse::<f64>(), lng.parse::<f64>()) else {
                return Err(bad_request("lat and lng must be numbers"));
            };
            let point = Coordinates::new(lat, lng);
            if !point.is_valid() {
                return Err(bad_request("lat and lng are out of range"));
            }
            Ok(Some(point))
        }
        _ => Err(bad_request("lat and lng must be given together")),
    }
}

/// GET /api/libraries?lat=&lng=
async fn list_libraries(
    State(libraries): State<GuardedLibraryDirectory>,
    Query(query): Query<NearQuery>,
) -> Response {
    match parse_near(&query) {
        Ok(near) => Json(libraries.list(near)).into_response(),
        Err(body) => body.into_response(),
    }
}

/// GET /api/libraries/{id}
async fn get_library(
    State(libraries): State<GuardedLibraryDirectory>,
    Path(id): Path<String>,
) -> Response {
    match libraries.get(&id) {
        Some(library) => Json(library).into_response(),
        None => ErrorBody {
            code: 404,
            msg: format!("Library not found: {}", id),
        }
        .into_response(),
    }
}

pub fn make_libraries_routes(state: ServerState) -> Router {
    Router::new()
        .route("/libraries", get(list_libraries))
        .route("/libraries/{id}", get(get_library))
        .with_state(state)
}
