//! Compute provider trait definition

use crate::error::Result;
use crate::record::{DiskRecord, InstanceRecord, Project, SnapshotRecord};
use async_trait::async_trait;

/// Compute control-plane abstraction
///
/// Every call maps to exactly one control-plane list/mutate request. All
/// calls are fallible network operations; callers decide whether a failure
/// is fatal or degrades to "no data for this project".
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// Returns the provider name (e.g. "gce", "mock")
    fn name(&self) -> &str;

    /// List every project the current credentials can reach.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// List the full instance inventory of one project.
    async fn list_instances(&self, project: &str) -> Result<Vec<InstanceRecord>>;

    /// Request an instance start. Dispatch-only: returns once the control
    /// plane has accepted the request, not when the instance is up.
    async fn start_instance(&self, project: &str, zone: &str, name: &str) -> Result<()>;

    /// Request an instance stop. Dispatch-only, like [`start_instance`].
    ///
    /// [`start_instance`]: ComputeProvider::start_instance
    async fn stop_instance(&self, project: &str, zone: &str, name: &str) -> Result<()>;

    /// Fetch the current state of a single instance, bypassing any caching
    /// the caller may have layered on top.
    async fn describe_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<InstanceRecord>;

    /// List disks in a project, optionally filtered to an exact disk name.
    async fn list_disks(&self, project: &str, name_filter: Option<&str>)
    -> Result<Vec<DiskRecord>>;

    /// Create a point-in-time snapshot of a disk. Synchronous: returns once
    /// the snapshot exists or the request has failed.
    async fn create_snapshot(
        &self,
        project: &str,
        zone: &str,
        disk: &str,
        name: &str,
    ) -> Result<()>;

    /// List snapshots in a project.
    async fn list_snapshots(&self, project: &str) -> Result<Vec<SnapshotRecord>>;
}
