//! Transport level errors.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to a CInP server.
#[derive(Error, Debug)]
pub enum CinpError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server rejected the request (HTTP 400).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        message: String,
        /// Per-field details, when the server supplied them.
        data: Option<Value>,
    },

    /// Session is missing or expired (HTTP 401).
    #[error("Invalid session")]
    InvalidSession,

    /// Authenticated user may not perform the request (HTTP 403).
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// URI did not resolve (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server side failure (HTTP 500).
    #[error("Server error: {message}")]
    Server { message: String },

    /// Any status the protocol does not define.
    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Malformed URI.
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// Response did not follow the protocol.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CinpError {
    /// True for errors the server reported about the request itself,
    /// as opposed to connectivity or session failures.
    #[must_use]
    pub fn is_server_rejection(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. } | Self::Server { .. })
    }
}
