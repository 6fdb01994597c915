//! Classification of non-success status responses.

use reach_api_models::ApiErrorBody;
use reach_monitor::RefreshError;
use serde_json::Value;

/// Classify a non-success response from its status and raw body.
///
/// A JSON body makes an application error carrying its `error` field, or the
/// status text when that field is missing. A body that is not JSON could not
/// be parsed and is a transport failure.
#[must_use]
pub fn classify_failure(status: u16, status_text: &str, body: &str) -> RefreshError {
    if let Ok(problem) = serde_json::from_str::<ApiErrorBody>(body) {
        return RefreshError::application(status, problem.error);
    }
    match serde_json::from_str::<Value>(body) {
        Ok(_) => RefreshError::application(status, status_text),
        Err(err) => {
            RefreshError::transport(format!("invalid error payload for status {status}: {err}"))
        }
    }
}
