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

//! SQLite read model over the Reach bot database: schema bootstrap, the
//! dashboard snapshot query, and the few writes the dashboard itself makes.

pub mod error;
pub mod repository;

pub use error::{DataError, Result as DataResult};
pub use repository::{RECENT_LOG_LIMIT, StatusRepository, TARGETED_STATUSES, TOP_TARGET_LIMIT};
