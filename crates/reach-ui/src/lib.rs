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
//! Browser frontend for the Reach dashboard.
//!
//! Writes into elements the page already contains (see [`targets`]) rather
//! than owning a component tree. The DOM sink, the fetch source, and the
//! timer are wasm-only; native builds keep the target table, the log entry
//! layout and the failure classification so they can be tested off-browser.

pub mod failure;
pub mod layout;
pub mod targets;

#[cfg(target_arch = "wasm32")]
mod boot;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod fetch;

#[cfg(target_arch = "wasm32")]
pub use boot::start;
