//! Audit Trail Server
//!
//! Main entry point that wires the storage backends, access policy and
//! HTTP API together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use audit_api::{AppState, build_router};
use audit_auth::{AccessPolicy, UserDirectory};
use audit_core::config::AppConfig;
use audit_core::config::logging::LogFormat;
use audit_core::error::AppError;
use audit_engine::AuditEngine;
use audit_storage::BackendRegistry;

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
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `AUDIT_ENV` overlay and `AUDIT__*` variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("AUDIT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting audit trail v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        searchable = %config.storage.searchable,
        archival = %config.storage.archival,
        "Initializing storage backends..."
    );
    let registry = BackendRegistry::from_config(&config.storage).await?;

    let policy = AccessPolicy::from_config(&config.auth);
    let engine = AuditEngine::from_registry(&registry, policy)?;
    let users = UserDirectory::from_config(&config.auth);
    tracing::info!(users = users.len(), "Access control initialized");

    let report = engine.health().await;
    if !report.is_healthy() {
        tracing::warn!(?report, "One or more storage backends are unreachable at startup");
    }

    let app = build_router(AppState::new(engine, users));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Audit trail server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Audit trail server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
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
