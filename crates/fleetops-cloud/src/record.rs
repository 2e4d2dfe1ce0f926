//! Wire records returned by provider backends
//!
//! Project and instance listings are always fetched wholesale; there is no
//! incremental per-record fetch anywhere in the model. Status enums keep an
//! `Other` arm because the control plane grows transient states faster than
//! this console cares to track them, and they must survive a round trip
//! through the persisted cache format unchanged.

/// An isolated account-like partition holding instances, disks and snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Globally unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Lifecycle state as reported by the control plane
    pub lifecycle_state: ProjectState,
}

/// Project lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectState {
    Active,
    DeleteRequested,
    DeleteInProgress,
    Other(String),
}

impl ProjectState {
    pub fn parse(s: &str) -> Self {
        match s {
            "ACTIVE" => ProjectState::Active,
            "DELETE_REQUESTED" => ProjectState::DeleteRequested,
            "DELETE_IN_PROGRESS" => ProjectState::DeleteInProgress,
            other => ProjectState::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectState::Active => write!(f, "ACTIVE"),
            ProjectState::DeleteRequested => write!(f, "DELETE_REQUESTED"),
            ProjectState::DeleteInProgress => write!(f, "DELETE_IN_PROGRESS"),
            ProjectState::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A single virtual machine within a project.
///
/// The (project id, name) pair is the composite key; the record itself only
/// carries the name because instances are always listed per project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    pub name: String,

    /// Zone in region-letter form, e.g. "us-east1-b"
    pub zone: String,

    pub status: InstanceStatus,

    /// Absent when the instance has no public address
    pub external_ip: Option<String>,

    pub internal_ip: String,

    pub machine_type: String,
}

/// Instance power/provisioning status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceStatus {
    Running,
    Terminated,
    Stopping,
    Staging,
    Other(String),
}

impl InstanceStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "RUNNING" => InstanceStatus::Running,
            "TERMINATED" => InstanceStatus::Terminated,
            "STOPPING" => InstanceStatus::Stopping,
            "STAGING" => InstanceStatus::Staging,
            other => InstanceStatus::Other(other.to_string()),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, InstanceStatus::Running)
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceStatus::Running => write!(f, "RUNNING"),
            InstanceStatus::Terminated => write!(f, "TERMINATED"),
            InstanceStatus::Stopping => write!(f, "STOPPING"),
            InstanceStatus::Staging => write!(f, "STAGING"),
            InstanceStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A persistent disk, resolved independently of the instance inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskRecord {
    pub name: String,
    pub zone: String,
}

/// A point-in-time disk snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub name: String,

    /// Name of the source disk
    pub disk: String,

    pub status: String,
}
