//! Status source backed by the browser's fetch API.

use async_trait::async_trait;
use gloo_net::http::Request;
use reach_api_models::{STATUS_PATH, StatusSnapshot};
use reach_monitor::{RefreshError, StatusSource};

use crate::failure::classify_failure;

/// Requests the status endpoint relative to the page origin.
pub(crate) struct FetchStatusSource {
    url: String,
}

impl FetchStatusSource {
    pub(crate) fn same_origin() -> Self {
        Self {
            url: STATUS_PATH.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl StatusSource for FetchStatusSource {
    async fn fetch_status(&self) -> Result<StatusSnapshot, RefreshError> {
        let response = Request::get(&self.url)
            .send()
            .await
            .map_err(|err| RefreshError::transport(err.to_string()))?;

        if !response.ok() {
            let body = response
                .text()
                .await
                .map_err(|err| RefreshError::transport(err.to_string()))?;
            return Err(classify_failure(
                response.status(),
                &response.status_text(),
                &body,
            ));
        }

        response
            .json::<StatusSnapshot>()
            .await
            .map_err(|err| RefreshError::transport(format!("invalid status payload: {err}")))
    }
}
