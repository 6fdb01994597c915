use std::net::SocketAddr;
use std::path::PathBuf;

use reach_telemetry::{DEFAULT_LOG_LEVEL, LogFormat};

use crate::error::{AppError, AppResult};

const ENV_DATABASE_URL: &str = "REACH_DATABASE_URL";
const ENV_BIND_ADDR: &str = "REACH_BIND_ADDR";
const ENV_LOG_LEVEL: &str = "REACH_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "REACH_LOG_FORMAT";
const ENV_UI_DIR: &str = "REACH_UI_DIR";

/// Bot database opened when `REACH_DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://reach.db?mode=rwc";
/// Listener address used when `REACH_BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Server configuration read from `REACH_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `SQLite` connection string for the bot database.
    pub database_url: String,
    /// Address the HTTP listener binds.
    pub bind_addr: SocketAddr,
    /// Fallback log level when `RUST_LOG` is not set.
    pub log_level: String,
    /// Explicit log format; inferred from the build profile when absent.
    pub log_format: Option<LogFormat>,
    /// Directory holding the browser frontend bundle, served under `/assets`.
    pub assets_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfig`] when a variable is present but
    /// malformed.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfig`] when a variable is present but
    /// malformed.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_raw = read(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| AppError::InvalidConfig {
                field: ENV_BIND_ADDR,
                reason: "not_a_socket_address",
                value: Some(bind_raw),
            })?;

        let log_format = read(ENV_LOG_FORMAT)
            .map(|raw| {
                raw.parse::<LogFormat>()
                    .map_err(|_| AppError::InvalidConfig {
                        field: ENV_LOG_FORMAT,
                        reason: "unknown_format",
                        value: Some(raw),
                    })
            })
            .transpose()?;

        let database_url =
            read(ENV_DATABASE_URL).unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if !database_url.starts_with("sqlite:") {
            return Err(AppError::InvalidConfig {
                field: ENV_DATABASE_URL,
                reason: "not_sqlite",
                value: Some(database_url),
            });
        }

        Ok(Self {
            database_url,
            bind_addr,
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format,
            assets_dir: read(ENV_UI_DIR).map(PathBuf::from),
        })
    }
}
