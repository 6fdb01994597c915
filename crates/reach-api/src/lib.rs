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

//! HTTP surface of the Reach dashboard: the status endpoint polled by the
//! frontends, the page that hosts the browser frontend, and a health check.
//!
//! Layout:
//! - `store.rs`: the `StatusStore` seam handlers read through
//! - `state.rs`: shared application state
//! - `http/`: router, handlers, and response errors
//! - `error.rs`: server bootstrap and serve failures

pub mod error;
pub(crate) mod http;
pub(crate) mod state;
pub mod store;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
pub use store::{SharedStore, StatusStore};
