//! Compute control-plane abstraction for FleetOps
//!
//! Defines the `ComputeProvider` trait and the wire records every provider
//! backend returns. Instance names are unique within a project, never across
//! projects; addressing any single instance always requires the full
//! (project, zone, name) triple.

pub mod error;
pub mod provider;
pub mod record;

#[cfg(feature = "mock")]
pub mod mock;

pub use error::{CloudError, Result};
pub use provider::ComputeProvider;
pub use record::{
    DiskRecord, InstanceRecord, InstanceStatus, Project, ProjectState, SnapshotRecord,
};
