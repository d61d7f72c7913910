//! Ad Review API Server
//!
//! Accepts an uploaded advertisement image, asks a vision model to review
//! it and returns the review as structured JSON. Provides:
//!
//! - `POST /analyze-ad` - multipart upload (`adImage`), returns the report
//! - `GET /health` - liveness check
//!
//! The server keeps no state between requests. Each upload lives in a temp
//! file for the duration of its request only.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vision_client::{AnthropicClient, VisionModel};

mod api;
mod config;
mod error;
mod upload;

use api::{handle_analyze_ad, handle_health};
use config::{Args, ServerConfig};

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn VisionModel>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(model: Arc<dyn VisionModel>, config: ServerConfig) -> Self {
        Self {
            model,
            config: Arc::new(config),
        }
    }
}

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Result<Router> {
    let cors = state.config.cors_layer()?;
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let app = Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Analysis
        .route("/analyze-ad", post(handle_analyze_ad))
        // Apply middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(app)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose {
        "adreview_api=debug,vision_client=debug,tower_http=debug"
    } else {
        "adreview_api=info,vision_client=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = args.server_config();
    let client = AnthropicClient::new(args.api_key.as_str())?
        .with_base_url(args.api_base_url.as_str())
        .with_model(args.model.as_str())
        .with_max_tokens(args.max_tokens);

    info!("Starting ad review server on {}:{}", config.host, config.port);
    info!("Model: {}", client.model());
    match config.upstream_timeout {
        Some(budget) => info!("Upstream timeout: {}ms", budget.as_millis()),
        None => info!("Upstream timeout: disabled"),
    }

    let addr = config.socket_addr()?;
    let state = AppState::new(Arc::new(client), config);
    let app = build_router(state)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
