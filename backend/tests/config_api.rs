use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::Request,
};
use backend::{AppState, config::ServerConfig, create_router};
use hyper::StatusCode;
use shared::{ApiError, ClientConfig, DEFAULT_CENTER, TravelMode};
use tower::ServiceExt;

fn server_config(api_key: Option<&str>) -> ServerConfig {
    ServerConfig {
        bind: "127.0.0.1:0".parse().unwrap(),
        maps_api_key: api_key.map(str::to_string),
        static_dir: None,
        travel_mode: TravelMode::Driving,
        optimize_waypoints: false,
        default_center: DEFAULT_CENTER,
        default_zoom: 10,
    }
}

fn test_app(config: ServerConfig) -> axum::Router {
    create_router(AppState {
        config: Arc::new(config),
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn config_endpoint_returns_client_settings() {
    let app = test_app(server_config(Some("test-key")));

    let response = app.oneshot(get("/api/config")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: ClientConfig = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.maps_api_key, "test-key");
    assert_eq!(body.default_center, DEFAULT_CENTER);
    assert_eq!(body.default_zoom, 10);
    assert_eq!(body.travel_mode, TravelMode::Driving);
}

#[tokio::test]
async fn config_endpoint_reports_missing_key() {
    let app = test_app(server_config(None));

    let response = app.oneshot(get("/api/config")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: ApiError = serde_json::from_slice(&bytes).unwrap();
    assert!(body.message.contains("MAPS_API_KEY"));
}

#[tokio::test]
async fn config_endpoint_allows_cross_origin_calls() {
    let app = test_app(server_config(Some("test-key")));
    let request = Request::builder()
        .method("GET")
        .uri("/api/config")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app(server_config(None));

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn unknown_path_without_static_dir_is_not_found() {
    let app = test_app(server_config(Some("test-key")));

    let response = app.oneshot(get("/index.html")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_dir_serves_bundle_with_spa_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<section id=\"app\"></section>").unwrap();
    std::fs::create_dir(dir.path().join("pkg")).unwrap();
    std::fs::write(dir.path().join("pkg/frontend.js"), "export default 1;").unwrap();

    let config = ServerConfig {
        static_dir: Some(dir.path().to_path_buf()),
        ..server_config(Some("test-key"))
    };
    let app = test_app(config);

    let asset = app.clone().oneshot(get("/pkg/frontend.js")).await.unwrap();
    assert_eq!(asset.status(), StatusCode::OK);
    let bytes = to_bytes(asset.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"export default 1;");

    let fallback = app.oneshot(get("/some/deep/link")).await.unwrap();
    let bytes = to_bytes(fallback.into_body(), 1024).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("id=\"app\""));
}
