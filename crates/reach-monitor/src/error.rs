//! Failures that end a refresh cycle.

use thiserror::Error;

/// Why a refresh cycle could not render a snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    /// The backend answered with a non-success status.
    #[error("status endpoint reported a failure: {message}")]
    Application {
        /// HTTP status code returned by the backend.
        status: u16,
        /// The body's `error` field, or the status text when absent.
        message: String,
    },
    /// The request did not complete or the body could not be decoded.
    #[error("status request failed: {message}")]
    Transport {
        /// Description of the underlying failure.
        message: String,
    },
}

impl RefreshError {
    /// Build an application error from a status code and message.
    #[must_use]
    pub fn application(status: u16, message: impl Into<String>) -> Self {
        Self::Application {
            status,
            message: message.into(),
        }
    }

    /// Build a transport error from any displayable failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Failure description without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Application { message, .. } | Self::Transport { message } => message,
        }
    }

    /// `true` for failures that never reached the backend's handler.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Text of the single log-list entry shown in place of the snapshot.
    #[must_use]
    pub fn marker_text(&self) -> String {
        match self {
            Self::Application { message, .. } => format!("Failed to load data: {message}"),
            Self::Transport { message } => format!("Network error: {message}"),
        }
    }
}
