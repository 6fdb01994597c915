//! Snapshot store abstraction for the API layer.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reach_api_models::StatusSnapshot;
use reach_data::StatusRepository;

/// Backend the status endpoint reads from.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Build the current dashboard snapshot.
    async fn dashboard_snapshot(&self) -> Result<StatusSnapshot>;
}

/// Shared reference to the snapshot backend.
pub type SharedStore = Arc<dyn StatusStore>;

#[async_trait]
impl StatusStore for StatusRepository {
    async fn dashboard_snapshot(&self) -> Result<StatusSnapshot> {
        Ok(Self::dashboard_snapshot(self).await?)
    }
}
