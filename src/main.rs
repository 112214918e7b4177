//! Dark Tracer Server
//!
//! Detects anomalous spatiotemporal patterns in uploaded event data.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       DARK TRACER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  API      │  │  Schema   │  │  Scorers                │ │
//! │  │  Gateway  │─▶│  + Feature│─▶│  (Isolation Forest /    │ │
//! │  │  (Axum)   │  │  Deriver  │  │   Z-score)              │ │
//! │  └───────────┘  └───────────┘  └────────────┬────────────┘ │
//! │                                             ▼              │
//! │                              ┌──────────────────────────┐  │
//! │                              │ Presenter (report, map,  │  │
//! │                              │ CSV export)              │  │
//! │                              └──────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod logic;
mod models;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    init_tracing(&config);

    tracing::info!("Dark Tracer starting...");
    tracing::info!(
        "Environment: {}, upload limit: {} bytes, default seed: {}",
        config.environment,
        config.max_upload_bytes,
        config.default_seed
    );

    let state = AppState {
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "darktracer=debug,tower_http=debug".into());

    if config.json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let detection_routes = Router::new()
        .route("/api/v1/detect/isolation-forest", post(handlers::detect::isolation_forest))
        .route("/api/v1/detect/isolation-forest/export", post(handlers::detect::isolation_forest_export))
        .route("/api/v1/detect/zscore", post(handlers::detect::zscore))
        .route("/api/v1/detect/zscore/export", post(handlers::detect::zscore_export))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(detection_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
