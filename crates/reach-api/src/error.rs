//! Listener and serve failures of the dashboard server. Messages are constant;
//! the address and IO cause travel as fields.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::net::SocketAddr;

/// Result alias for [`ApiServer`](crate::ApiServer) lifecycle calls.
pub type ApiServerResult<T> = std::result::Result<T, ApiServerError>;

/// Why the dashboard server could not start or stopped early.
#[derive(Debug)]
pub enum ApiServerError {
    /// The listen address could not be bound.
    Bind {
        /// Address from `REACH_BIND_ADDR`.
        addr: SocketAddr,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The accept loop ended with an IO error.
    Serve {
        /// Underlying IO error.
        source: std::io::Error,
    },
}

impl Display for ApiServerError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { .. } => formatter.write_str("failed to bind dashboard listener"),
            Self::Serve { .. } => formatter.write_str("dashboard server stopped unexpectedly"),
        }
    }
}

impl Error for ApiServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bind { source, .. } | Self::Serve { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn bind_and_serve_errors_keep_io_cause() {
        let bind = ApiServerError::Bind {
            addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };
        assert_eq!(bind.to_string(), "failed to bind dashboard listener");
        assert!(bind.source().is_some());

        let serve = ApiServerError::Serve {
            source: io::Error::other("reset"),
        };
        assert_eq!(serve.to_string(), "dashboard server stopped unexpectedly");
        assert!(serve.source().is_some());
    }
}
