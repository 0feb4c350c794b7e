//! Errors surfaced by the binding layer.

use cinp::CinpError;
use serde_json::Value;
use thiserror::Error;

/// Result alias for binding operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while working with Contractor resources.
///
/// Nothing is retried: every error is returned to the caller as soon as it
/// happens.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input detected before any request was sent.
    #[error("{0}")]
    Argument(String),

    /// The server has no object with the requested identity.
    #[error("{0}")]
    NotFound(String),

    /// The server rejected field values on create or update.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        /// Per-field problems as reported by the server.
        fields: Option<Value>,
    },

    /// Connectivity, session or serialization failure.
    #[error(transparent)]
    Transport(CinpError),

    /// A remote action was rejected.
    #[error("{action} failed: {message}")]
    Action { action: String, message: String },
}

impl Error {
    /// Shorthand for an argument error.
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    /// Map an error from a remote action call.
    pub(crate) fn from_call(action: &str, err: CinpError) -> Self {
        match err {
            CinpError::InvalidRequest { message, .. } | CinpError::Server { message } => {
                Self::Action {
                    action: action.to_string(),
                    message,
                }
            }
            other => other.into(),
        }
    }
}

impl From<CinpError> for Error {
    fn from(err: CinpError) -> Self {
        match err {
            CinpError::NotFound(uri) => Self::NotFound(format!("{uri} not found")),
            CinpError::InvalidRequest { message, data } => Self::Validation {
                message,
                fields: data,
            },
            other => Self::Transport(other),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(CinpError::Serialization(err))
    }
}
