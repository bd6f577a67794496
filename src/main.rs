// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use tokio::{net::TcpListener, signal};
use tracing_subscriber::EnvFilter;

use pitchday_server::{
    api::{cors_layer, router},
    auth::SessionIssuer,
    config::{LogFormat, ServerConfig, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::EventDatabase,
};

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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

    tracing::info!("Shutdown signal received");
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db = EventDatabase::open(&config.database_path)?;
    tracing::info!(path = %config.database_path.display(), "Database opened");

    let sessions = SessionIssuer::new(
        config.jwt_secret.as_bytes(),
        config.jwt_issuer.clone(),
        config.token_ttl_days,
    );
    let state = AppState::new(db, sessions);
    let app = router(state, cors_layer(&config.cors_allowed_origin)?);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Pitchday server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router, and with it the last database handle, is dropped here
    tracing::info!("Server stopped, database closed");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_file = dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    init_tracing(
        config
            .as_ref()
            .map(|c| c.log_format)
            .unwrap_or(LogFormat::Pretty),
    );
    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
