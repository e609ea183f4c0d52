pub mod config;
pub mod error;

use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use shared::{ApiError, ClientConfig};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::error::ConfigError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/api/config", get(config_handler))
        .route("/api/health", get(health_handler))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).not_found_service(index))
        }
        None => router,
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}

async fn config_handler(
    State(state): State<AppState>,
) -> Result<Json<ClientConfig>, (StatusCode, Json<ApiError>)> {
    state
        .config
        .client_config()
        .map(Json)
        .map_err(config_error_to_api_error)
}

async fn health_handler() -> &'static str {
    "ok"
}

fn config_error_to_api_error(err: ConfigError) -> (StatusCode, Json<ApiError>) {
    let status = match err {
        ConfigError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!("config request failed: {err}");

    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
