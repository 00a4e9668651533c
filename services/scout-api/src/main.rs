//! Scout API
//!
//! HTTP front end for the SDS crawler: accepts a CAS number or substance
//! name, scouts the configured sources and reports whether a matching PDF
//! was found.

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    Router,
};
use scout_crawler::{HttpTransport, Scout};
use scout_utils::{init_logging, AppConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

mod handlers;
mod metrics;
mod middleware;
mod routes;

use metrics::ScoutMetrics;
use middleware::request_id_middleware;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    // Initialize logging
    init_logging(&config.logging)?;
    info!("Starting Scout API");

    let scout = Scout::from_config(&config)?;
    let state = AppState::new(scout)?;
    let app = create_app(state, &config);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Scout API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn create_app(state: AppState, config: &AppConfig) -> Router {
    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE]),
                )
                .layer(DefaultBodyLimit::max(config.server.max_request_size))
                .layer(axum::middleware::from_fn(request_id_middleware)),
        )
        .with_state(state)
}

#[derive(Clone)]
pub struct AppState {
    pub scout: Arc<Scout<HttpTransport>>,
    pub metrics: ScoutMetrics,
}

impl AppState {
    pub fn new(scout: Scout<HttpTransport>) -> Result<Self> {
        Ok(Self {
            scout: Arc::new(scout),
            metrics: ScoutMetrics::new().context("Failed to register metrics")?,
        })
    }
}
