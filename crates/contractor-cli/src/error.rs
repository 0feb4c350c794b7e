//! Error type for the command layer.

use thiserror::Error;

/// Errors raised while running a command.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Contractor(#[from] contractor::Error),

    /// Login, logout or client construction failed.
    #[error(transparent)]
    Transport(#[from] cinp::CinpError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<handlebars::RenderError> for CliError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render(err.to_string())
    }
}

/// Result alias for command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Argument error for a missing flag, raised before any request is sent.
pub fn required(flag: &str) -> CliError {
    contractor::Error::argument(format!("{flag} is required")).into()
}
