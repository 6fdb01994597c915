#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Status polling core for the Reach dashboard.
//!
//! Layout:
//! - `source.rs`: where snapshots come from (`StatusSource`)
//! - `sink.rs`: where they are drawn (`RenderSink`)
//! - `view.rs`: counter and log-line view model
//! - `poller.rs`: one refresh cycle, fetch then render
//! - `schedule.rs`: the native timer loop (not built for wasm32)
//!
//! Frontends own the composition: they build a source and a sink, wrap them in
//! a [`StatusPoller`], and drive it from their own timer.

use std::time::Duration;

pub mod error;
pub mod poller;
#[cfg(not(target_arch = "wasm32"))]
pub mod schedule;
pub mod sink;
pub mod source;
pub mod view;

pub use error::RefreshError;
pub use poller::StatusPoller;
#[cfg(not(target_arch = "wasm32"))]
pub use schedule::{OverlapPolicy, RefreshSchedule};
pub use sink::RenderSink;
pub use source::StatusSource;
pub use view::{COUNTER_ERROR, Counters, LogLine};

/// Fixed delay between the starts of two refresh cycles.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(5_000);
