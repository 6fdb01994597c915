//! One refresh cycle: fetch a snapshot, then project it onto the sink.

use std::sync::{Mutex, PoisonError};

use reach_api_models::StatusSnapshot;
use tracing::{debug, error, warn};

use crate::error::RefreshError;
use crate::sink::RenderSink;
use crate::source::StatusSource;
use crate::view::{Counters, log_lines};

/// Couples a status source with the sink it renders into.
///
/// Cycles may overlap. Each cycle's render pass is applied under a gate so the
/// sink never shows counters from one snapshot next to logs from another; the
/// pass that finishes last wins.
pub struct StatusPoller<S, K> {
    source: S,
    sink: K,
    render_gate: Mutex<()>,
}

impl<S, K> StatusPoller<S, K>
where
    S: StatusSource,
    K: RenderSink,
{
    /// Wire a source to a sink.
    pub const fn new(source: S, sink: K) -> Self {
        Self {
            source,
            sink,
            render_gate: Mutex::new(()),
        }
    }

    /// The source this poller fetches from.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The sink this poller draws into.
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Run a full cycle. Failures are displayed and logged, never returned.
    pub async fn refresh(&self) {
        let outcome = self.fetch().await;
        self.render(outcome);
    }

    /// Fetch phase of a cycle.
    ///
    /// # Errors
    ///
    /// Returns the source's classification of the failure.
    pub async fn fetch(&self) -> Result<StatusSnapshot, RefreshError> {
        self.source.fetch_status().await
    }

    /// Render phase of a cycle.
    pub fn render(&self, outcome: Result<StatusSnapshot, RefreshError>) {
        let _gate = self
            .render_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match outcome {
            Ok(snapshot) => {
                debug!(
                    total_users = snapshot.total_users,
                    entries = snapshot.recent_logs.len(),
                    "rendering status snapshot"
                );
                self.sink.set_counters(&Counters::from_snapshot(&snapshot));
                self.sink.set_log_entries(&log_lines(&snapshot));
            }
            Err(err) => {
                match &err {
                    RefreshError::Transport { message } => {
                        error!(error = %message, "status request failed");
                    }
                    RefreshError::Application { status, message } => {
                        warn!(status, error = %message, "status endpoint reported a failure");
                    }
                }
                self.sink.show_error(&err);
            }
        }
    }
}
