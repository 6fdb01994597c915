//! Where status snapshots come from.

use async_trait::async_trait;
use reach_api_models::StatusSnapshot;

use crate::error::RefreshError;

/// Issues one status request and classifies its outcome.
///
/// Implementations map a non-success status to
/// [`RefreshError::Application`] and every other failure (connection,
/// decoding) to [`RefreshError::Transport`]. They must not retry.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait StatusSource {
    /// Fetch the latest snapshot.
    async fn fetch_status(&self) -> Result<StatusSnapshot, RefreshError>;
}
