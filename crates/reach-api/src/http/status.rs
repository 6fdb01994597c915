//! Status and health endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use reach_api_models::StatusSnapshot;
use serde::Serialize;
use tracing::error;

use crate::http::errors::ApiError;
use crate::state::ApiState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
}

/// `GET /api/data`: the snapshot the dashboards poll.
pub(crate) async fn status_data(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<StatusSnapshot>, ApiError> {
    match state.store.dashboard_snapshot().await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(err) => {
            let message = format!("{err:#}");
            error!(error = %message, "failed to build dashboard snapshot");
            Err(ApiError::internal(message))
        }
    }
}

pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
