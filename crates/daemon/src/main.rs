//! Boltz Prediction Server - Main Entry Point

mod config;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use boltz_api_rpc::RpcServer;
use boltz_core::application::{Invoker, PredictionService};
use boltz_core::port::{Sha256IdProvider, SystemTimeProvider};
use boltz_infra_store::{ArtifactLayout, FsArtifactStore, InMemoryJobRegistry};
use boltz_infra_system::{BoltzRunner, BoltzRunnerConfig, SystemProbeImpl};
use config::{ServerConfig, Transport};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logs go to stderr; stdout is reserved for stdio JSON-RPC frames
fn init_logging() -> Result<WorkerGuard> {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let log_format = std::env::var("BOLTZ_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("boltz=info"))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(writer))
                .init();
        }
        _ => {
            // Development: human-readable, no colors on a shared stderr
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_ansi(false).with_writer(writer))
                .init();
        }
    }

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let _log_guard = init_logging()?;
    info!("Boltz Prediction Server v{} starting...", VERSION);

    // 2. Load configuration
    let config = ServerConfig::from_env()?;
    info!(
        transport = ?config.transport,
        data_dir = %config.data_dir.display(),
        boltz_binary = %config.boltz_binary.display(),
        max_upload_bytes = config.max_upload_bytes,
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let layout = ArtifactLayout::under(&config.data_dir);
    let artifacts = Arc::new(
        FsArtifactStore::open(layout.clone(), config.max_upload_bytes)
            .context("Failed to prepare data directories")?,
    );
    let registry = Arc::new(InMemoryJobRegistry::new());
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(Sha256IdProvider);
    let system_probe = Arc::new(SystemProbeImpl::new());

    let runner = Arc::new(BoltzRunner::new(
        BoltzRunnerConfig {
            binary: config.boltz_binary.clone(),
            cache_dir: layout.model_cache_dir.clone(),
        },
        time_provider.clone(),
    ));

    let invoker = Arc::new(Invoker::new(
        registry.clone(),
        artifacts.clone(),
        runner,
        time_provider.clone(),
    ));

    let service = Arc::new(PredictionService::new(
        registry,
        artifacts,
        id_provider,
        time_provider,
        system_probe,
        invoker,
    ));

    let rpc_server = RpcServer::new(config.rpc_config(), service);

    // 4. Serve until shutdown
    match config.transport {
        Transport::Http => {
            let (rpc_handle, addr) = rpc_server
                .start()
                .await
                .context("RPC server start failed")?;

            info!(addr = %addr, "System ready. Press Ctrl+C to shutdown");
            tokio::signal::ctrl_c().await?;
            info!("Shutdown signal received. Exiting gracefully...");

            rpc_handle
                .stop()
                .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
            rpc_handle.stopped().await;
        }
        Transport::Stdio => {
            tokio::select! {
                served = rpc_server.serve_stdio() => served.context("Stdio transport failed")?,
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    info!("Shutdown signal received. Exiting gracefully...");
                }
            }
        }
    }

    // Running inference children are not awaited
    info!("Shutdown complete.");

    Ok(())
}
