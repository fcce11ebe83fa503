//! coreBanking - in-memory banking ledger HTTP server
//!
//! Accounts and balances live in memory only; nothing survives a restart.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use core_banking::api::{self, AppState};
use core_banking::reporting::LogChannel;
use core_banking::{Config, Ledger};

/// How long shutdown waits for the error log to drain
const LOG_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialize tracing/logging
fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the application router
fn build_router(state: AppState, config: &Config) -> Router {
    let api_router = api::create_router().layer(middleware::from_fn(
        api::middleware::logging_middleware,
    ));

    // Request id is set before tracing sees the request
    Router::new()
        .route("/health", get(health_check))
        .nest(&config.api_prefix(), api_router)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!(app = %config.app_name, "Starting server");

    let (log_channel, log_worker) =
        LogChannel::open(&config.log_path, config.log_channel_capacity).await?;
    log_channel.send("[INFO] Log worker started");

    let ledger = Ledger::in_memory();
    log_channel.send("[INFO] Ledger initialized");

    let state = AppState::new(ledger, Arc::new(log_channel.clone()));
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log_channel.send(format!("[INFO] Starting server on {addr}"));
    tracing::info!("Listening on http://{}{}", addr, config.api_prefix());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup
    tracing::info!("Server shutting down...");
    log_channel.send("[INFO] Server stopped");
    drop(log_channel);

    match tokio::time::timeout(LOG_DRAIN_TIMEOUT, log_worker.shutdown()).await {
        Ok(result) => result?,
        Err(_) => tracing::warn!("Error log did not drain in time"),
    }
    tracing::info!("Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
