use std::sync::Arc;

use reach_api::ApiServer;
use reach_data::StatusRepository;
use reach_telemetry::{LogFormat, LoggingConfig};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Entry point for the dashboard boot sequence.
///
/// # Errors
///
/// Returns an error if configuration, logging, the database, or the listener
/// cannot be brought up.
pub async fn run_app() -> AppResult<()> {
    let config = AppConfig::from_env()?;
    let logging = LoggingConfig {
        level: &config.log_level,
        format: config.log_format.unwrap_or_else(LogFormat::infer),
        ..LoggingConfig::default()
    };
    reach_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    run_app_with(&config, shutdown_signal()).await
}

/// Boot sequence over an already loaded configuration; returns once
/// `shutdown` resolves and in-flight requests have drained.
pub(crate) async fn run_app_with<F>(config: &AppConfig, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = %config.bind_addr, "Reach dashboard bootstrap starting");

    let api = build_api(config).await?;
    api.serve(config.bind_addr, shutdown)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;

    info!("dashboard shutdown complete");
    Ok(())
}

/// Open the bot database, make sure the tables the dashboard reads exist, and
/// wire the router over it.
pub(crate) async fn build_api(config: &AppConfig) -> AppResult<ApiServer> {
    let repository = StatusRepository::connect(&config.database_url)
        .await
        .map_err(|err| AppError::data("repository.connect", err))?;
    repository
        .ensure_schema()
        .await
        .map_err(|err| AppError::data("repository.ensure_schema", err))?;
    repository
        .record_log("INFO", "Dashboard server started")
        .await
        .map_err(|err| AppError::data("repository.record_log", err))?;

    if let Some(dir) = &config.assets_dir {
        info!(dir = %dir.display(), "serving browser frontend bundle");
    }
    Ok(ApiServer::new(Arc::new(repository), config.assets_dir.clone()))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for interrupt; running until killed");
        std::future::pending::<()>().await;
    }
    info!("interrupt received; shutting down");
}
