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

//! Logging and request-id helpers shared across the Reach workspace.
//!
//! Layout: `init.rs` (subscriber installation), `layers.rs` (tower layers),
//! `error.rs` (telemetry errors).

pub mod error;
pub mod init;
pub mod layers;

pub use error::{Result as TelemetryResult, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LogTarget, LoggingConfig, build_sha, init_logging};
pub use layers::{REQUEST_ID_HEADER, assign_request_id, echo_request_id, request_id_text};
