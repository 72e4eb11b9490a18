//! Restwell Burnout Analysis (rstw-an) - Main entry point
//!
//! HTTP microservice that scores free-text burnout reflections, enriches
//! them with AI-generated insights when a provider is reachable, and keeps
//! profiles, consent history, and analysis records in a single-document
//! JSON store.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use clap::Parser;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rstw_an::insight::InsightClient;
use rstw_an::store::DocumentStore;
use rstw_an::{build_router, AppState};
use rstw_common::config::{Config, DEFAULT_PORT};

/// Request bodies above this size are rejected outright
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Command-line arguments for rstw-an
#[derive(Parser, Debug)]
#[command(name = "rstw-an")]
#[command(about = "Burnout analysis microservice for Restwell")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "RSTW_AN_PORT")]
    port: u16,

    /// Path of the JSON document store
    #[arg(short, long, env = "RSTW_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Allowed CORS origin for the browser frontend
    #[arg(short = 'o', long, env = "RSTW_CORS_ORIGIN")]
    cors_origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rstw_an=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!(
        "Starting Restwell Burnout Analysis (rstw-an) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::resolve(args.db_path, args.cors_origin);
    info!("Document store: {}", config.db_path.display());
    info!("Allowed CORS origin: {}", config.cors_origin);

    // Create the store eagerly so a bad path or corrupt file fails startup
    // instead of the first request
    let store = Arc::new(DocumentStore::new(config.db_path.clone()));
    store
        .read()
        .await
        .context("Failed to initialize document store")?;

    let insight = Arc::new(InsightClient::from_env());
    let state = AppState::new(store, insight);

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .context("Invalid CORS origin")?,
        )
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let app = build_router(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("rstw-an listening on http://{}", addr);
    info!("Health check: http://{}/api/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
