use fleetops_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("no instance matching '{0}' in any accessible project")]
    NotFound(String),

    #[error("instance '{instance}' not found in project '{project}'")]
    InstanceNotFoundInProject { project: String, instance: String },

    #[error("selection {given} is out of range (1-{max})")]
    InvalidSelection { given: usize, max: usize },

    #[error("'{0}' is a dispatcher-class name; this endpoint only serves author/publish hosts")]
    WrongRole(String),

    #[error("no zone found for '{0}'")]
    ZoneNotFound(String),

    #[error("snapshot failed: {0}")]
    SnapshotFailed(String),

    #[error("cache IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CloudError> for FleetError {
    fn from(e: CloudError) -> Self {
        FleetError::ProviderUnavailable(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FleetError>;
