//! Router, handlers, and HTTP error mapping.

pub(crate) mod errors;
pub(crate) mod page;
pub(crate) mod router;
pub(crate) mod status;
