//! Where a refresh cycle draws its result.

use crate::error::RefreshError;
use crate::view::{Counters, LogLine};

/// Display surface holding the four counters and the log list.
///
/// Sinks are long-lived and non-owning with respect to the surface they write
/// to. Every call replaces what the previous call showed.
pub trait RenderSink {
    /// Replace the text of the four counters.
    fn set_counters(&self, counters: &Counters);

    /// Clear the log list and append `lines` in order.
    fn set_log_entries(&self, lines: &[LogLine]);

    /// Show a failed cycle: counters read `Error` and the list holds one
    /// marker entry.
    fn show_error(&self, error: &RefreshError) {
        self.set_counters(&Counters::error());
        self.set_log_entries(&[LogLine::marker(error.marker_text())]);
    }
}
