//! Charging Predictor - EV charging duration and pile fault prediction service
//!
//! Loads trained models once at startup and serves predictions over HTTP,
//! falling back to deterministic heuristics when a model is absent.

use anyhow::{Context, Result};
use charging_predictor::{api, config::ServiceConfig};
use predictor_lib::{
    health::HealthRegistry, ModelStore, PredictionService, StructuredLogger,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting charging-predictor");

    let config = ServiceConfig::load()?;
    info!(
        instance = %config.instance_name,
        model_dir = %config.model_dir.display(),
        "Predictor configured"
    );

    let logger = StructuredLogger::new(&config.instance_name);

    // Models are loaded once and never replaced while serving
    let registry = ModelStore::new(config.model_store_config(), logger.clone())
        .load_registry()
        .context("Failed to load prediction models")?;

    let service = Arc::new(PredictionService::new(
        &registry,
        config.output_config(),
        logger.clone(),
    ));
    let status = service.model_status();

    let health_registry = HealthRegistry::new();
    health_registry.record_model_status(status).await;

    logger.log_startup(SERVICE_VERSION, status);

    let app_state = Arc::new(api::AppState::new(service, health_registry.clone()));

    health_registry.set_ready(true).await;

    let shutdown_logger = logger.clone();
    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        shutdown_logger.log_shutdown("SIGINT received");
    };

    api::serve(&config.listen_address(), app_state, shutdown).await?;
    info!("Shutting down");

    Ok(())
}
