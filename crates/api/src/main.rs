//! tillstat - Square payments exporter for Prometheus
//!
//! Main entry point for the HTTP server.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tillstat_api::context::listen_addr;
use tillstat_api::utils::logging::init_tracing;
use tillstat_api::{create_router, AppContext};
use tillstat_domain::{Config, LoggingConfig};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before reading configuration from the environment
    let dotenv = dotenvy::dotenv();

    let config = match tillstat_infra::config::load() {
        Ok(config) => config,
        Err(err) => {
            match init_tracing(&LoggingConfig::default()) {
                Ok(()) => error!(error = %err, "Invalid configuration"),
                Err(_) => report_without_subscriber(&format!("Invalid configuration: {err}")),
            }
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_tracing(&config.logging) {
        report_without_subscriber(&format!("{err:#}"));
        return ExitCode::FAILURE;
    }

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "Could not load .env file"),
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = ?err, "Exporter stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let addr = listen_addr(&config)?;
    let context = Arc::new(AppContext::new(&config).await?);

    let listener =
        TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;

    info!(
        %addr,
        location_id = %config.square.location_id,
        window_hours = config.scrape.window_hours,
        on_fetch_error = %config.scrape.on_fetch_error,
        "Square exporter listening"
    );

    axum::serve(listener, create_router(context))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Square exporter stopped");
    Ok(())
}

/// Write a startup failure to stderr when no tracing subscriber could be
/// installed.
#[allow(clippy::print_stderr)]
fn report_without_subscriber(message: &str) {
    eprintln!("{message}");
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
