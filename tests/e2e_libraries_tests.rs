//! End-to-end tests for the library directory and the status endpoints

mod common;

use common::{
    TestClient, TestServer, TestServerOptions, LIBRARY_CITY_ID, LIBRARY_SCIENCE_PARK_ID,
    LIBRARY_UTRECHT_ID,
};
use reqwest::StatusCode;
use serde_json::Value;

async fn json(response: reqwest::Response) -> Value {
    response.json().await.expect("Response was not JSON")
}

fn ids(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|library| library["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Libraries
// =============================================================================

#[tokio::test]
async fn test_list_libraries_in_file_order() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_libraries().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "max-age=60"
    );

    let body = json(response).await;
    assert_eq!(
        ids(&body),
        vec![LIBRARY_CITY_ID, LIBRARY_SCIENCE_PARK_ID, LIBRARY_UTRECHT_ID]
    );
    assert!(body[0].get("distance_km").is_none());
    assert_eq!(body[0]["opening_hours"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_libraries_near_point() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    // Utrecht Centraal
    let response = client.get_libraries_near("52.0894", "5.1101").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(
        ids(&body),
        vec![LIBRARY_UTRECHT_ID, LIBRARY_SCIENCE_PARK_ID, LIBRARY_CITY_ID]
    );
    let nearest = body[0]["distance_km"].as_f64().unwrap();
    assert!(nearest < 2.0, "nearest library at {} km", nearest);
    assert!(body[2]["distance_km"].as_f64().unwrap() > 30.0);
}

#[tokio::test]
async fn test_list_libraries_rejects_bad_coordinates() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    for (lat, lng) in [("52.1", ""), ("north", "5.1"), ("91", "5.1")] {
        let response = client.get_libraries_near(lat, lng).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} {}", lat, lng);
        assert_eq!(json(response).await["code"], 400);
    }
}

#[tokio::test]
async fn test_get_library() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_library(LIBRARY_SCIENCE_PARK_ID).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["name"], "Science Park Library");
    assert_eq!(body["phone"], "+31 20 000 0000");
    assert_eq!(body["location"]["lat"], 52.3546);
}

#[tokio::test]
async fn test_get_unknown_library() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_library("atlantis").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get("cache-control").is_none());

    let body = json(response).await;
    assert_eq!(body["code"], 404);
    assert!(body["msg"].as_str().unwrap().contains("atlantis"));
}

// =============================================================================
// Status and frontend
// =============================================================================

#[tokio::test]
async fn test_status_reports_configuration() {
    let server = TestServer::spawn_with(TestServerOptions {
        summon: false,
        blog: false,
        ..Default::default()
    })
    .await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_status().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["search_apis"], serde_json::json!(["aquabrowser"]));
    assert_eq!(body["default_search_api"], "summon");
    assert_eq!(body["blog_enabled"], false);
    assert_eq!(body["libraries"], 3);
    assert!(body["uptime"].as_str().unwrap().starts_with("0d "));

    let home = json(client.get_home().await).await;
    assert_eq!(home["libraries"], 3);
}

#[tokio::test]
async fn test_frontend_is_served_from_directory() {
    let frontend = tempfile::TempDir::new().unwrap();
    std::fs::write(
        frontend.path().join("index.html"),
        "<html><body>Library map</body></html>",
    )
    .unwrap();

    let server = TestServer::spawn_with(TestServerOptions {
        frontend_dir_path: Some(frontend.path().to_string_lossy().to_string()),
        ..Default::default()
    })
    .await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_home().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Library map"));

    // API routes keep working next to the static files
    assert_eq!(client.get_status().await.status(), StatusCode::OK);
    assert_eq!(client.get_libraries().await.status(), StatusCode::OK);
}
