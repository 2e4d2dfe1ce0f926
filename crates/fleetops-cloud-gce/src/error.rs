//! GCE provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GceError {
    #[error("gcloud not found. Please install the Google Cloud SDK")]
    GcloudNotFound,

    #[error("gcloud command failed: {0}")]
    CommandFailed(String),

    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GceError>;
