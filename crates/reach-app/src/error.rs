//! # Design
//!
//! - Centralize application-level errors for bootstrap and serving.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration values were invalid.
    #[error("invalid configuration")]
    InvalidConfig {
        /// Environment variable that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Optional value associated with the failure.
        value: Option<String>,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: reach_telemetry::TelemetryError,
    },
    /// Status database operations failed.
    #[error("status database operation failed")]
    Data {
        /// Operation identifier.
        operation: &'static str,
        /// Source data error.
        source: reach_data::DataError,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: reach_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn telemetry(
        operation: &'static str,
        source: reach_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn data(operation: &'static str, source: reach_data::DataError) -> Self {
        Self::Data { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: reach_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}
