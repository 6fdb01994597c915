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
#![allow(clippy::redundant_pub_crate)]

//! Terminal watcher that polls the Reach status endpoint and redraws a
//! dashboard on every refresh.
//!
//! Layout:
//! - `cli.rs`: argument parsing and the watch loop
//! - `client.rs`: HTTP status source and CLI errors
//! - `output.rs`: terminal render sink
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod output;

pub use cli::run;
