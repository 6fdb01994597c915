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

//! Reach dashboard bootstrap wiring.
//!
//! Layout: `config.rs` (environment loading), `bootstrap.rs` (service wiring),
//! `error.rs` (application errors).

/// Application bootstrap and shutdown handling.
pub mod bootstrap;
/// Environment-driven server configuration.
pub mod config;
/// Application-level error types.
pub mod error;

pub use bootstrap::run_app;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
