//! LinkHub Server: social OAuth identity resolution and account linking.
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use linkhub_api::{Stores, build_app, build_state};
use linkhub_core::config::AppConfig;
use linkhub_core::error::AppError;
use linkhub_provider::ProviderRegistry;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file, overlay and environment, then validate it.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("LINKHUB_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    let env = std::env::var("LINKHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = AppConfig::load(&config_path, &env)?;
    config.validate()?;
    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LinkHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores ───────────────────────────────────────────
    let stores = Stores::connect(&config).await?;

    // ── Step 2: Provider adapters ────────────────────────────────
    let providers = ProviderRegistry::from_config(&config.providers)?;
    if providers.platforms().is_empty() {
        tracing::warn!("No provider is configured; every login will return 404");
    }

    // ── Step 3: Services and shared state ────────────────────────
    let bind_address = config.server.bind_address();
    let cors = config.server.cors.clone();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = build_state(config, &stores, providers)?;
    let app = build_app(state, &cors);

    // ── Step 4: Bind ─────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {bind_address}: {e}")))?;
    tracing::info!(address = %bind_address, "LinkHub server listening");

    // ── Step 5: Serve until signalled, then drain ────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, draining connections...");
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = async {
            let _ = shutdown_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Grace period elapsed, closing open connections");
        }
    }

    // ── Step 6: Release stores ───────────────────────────────────
    stores.close().await;

    tracing::info!("LinkHub server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
