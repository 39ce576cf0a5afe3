//! CLI error types

use onboard_gateway::GatewayError;
use onboard_progress::ProgressError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Gateway construction or request error
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Configuration or watcher error
    #[error(transparent)]
    Progress(#[from] ProgressError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session file could not be read or written
    #[error("Session error: {0}")]
    Session(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
