use std::sync::Arc;

use backend::{AppState, config::Args, create_router, error::ServeError};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ServeError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Args::parse().into_config()?;
    if config.maps_api_key.is_none() {
        tracing::warn!("MAPS_API_KEY is not set; the UI will report the map provider as unavailable");
    }
    match &config.static_dir {
        Some(dir) => tracing::info!("serving frontend from {}", dir.display()),
        None => tracing::info!("no static directory configured, serving API only"),
    }

    let addr = config.bind;
    let app = create_router(AppState {
        config: Arc::new(config),
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(ServeError::Bind)?;
    tracing::info!("starting backend on http://{addr}");
    axum::serve(listener, app).await.map_err(ServeError::Serve)
}
