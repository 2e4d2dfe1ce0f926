//! Provider error types

use thiserror::Error;

/// Errors surfaced by provider backends
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("provider CLI not found: {0}")]
    CliNotFound(String),

    #[error("command execution failed: {0}")]
    CommandFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
