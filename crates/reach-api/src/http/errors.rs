//! Error responses in the `{ "error": ... }` shape the frontends decode.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reach_api_models::ApiErrorBody;

#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiErrorBody::new(self.message))).into_response()
    }
}
