//! Compute Engine provider implementation

use crate::error::GceError;
use crate::gcloud::{Gcloud, GceInstance};
use async_trait::async_trait;
use fleetops_cloud::{
    CloudError, ComputeProvider, DiskRecord, InstanceRecord, InstanceStatus, Project,
    ProjectState, SnapshotRecord,
};

/// Compute Engine provider backed by the gcloud CLI
pub struct GceProvider {
    gcloud: Gcloud,
}

impl GceProvider {
    pub fn new() -> Self {
        Self {
            gcloud: Gcloud::new(),
        }
    }
}

impl Default for GceProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn to_record(instance: GceInstance) -> InstanceRecord {
    InstanceRecord {
        zone: instance.zone_leaf(),
        status: InstanceStatus::parse(&instance.status),
        external_ip: instance.external_ip(),
        internal_ip: instance.internal_ip().unwrap_or_default(),
        machine_type: instance.machine_type_leaf(),
        name: instance.name,
    }
}

fn map_err(e: GceError) -> CloudError {
    match e {
        GceError::GcloudNotFound => CloudError::CliNotFound("gcloud".to_string()),
        GceError::CommandFailed(msg) => CloudError::CommandFailed(msg),
        GceError::InstanceNotFound(name) => CloudError::ResourceNotFound(name),
        GceError::JsonError(e) => CloudError::ApiError(e.to_string()),
        GceError::IoError(e) => CloudError::Io(e),
    }
}

#[async_trait]
impl ComputeProvider for GceProvider {
    fn name(&self) -> &str {
        "gce"
    }

    async fn list_projects(&self) -> fleetops_cloud::Result<Vec<Project>> {
        let projects = self.gcloud.list_projects().await.map_err(map_err)?;
        Ok(projects
            .into_iter()
            .map(|p| Project {
                id: p.project_id,
                name: p.name,
                lifecycle_state: ProjectState::parse(&p.lifecycle_state),
            })
            .collect())
    }

    async fn list_instances(&self, project: &str) -> fleetops_cloud::Result<Vec<InstanceRecord>> {
        let instances = self.gcloud.list_instances(project).await.map_err(map_err)?;
        Ok(instances.into_iter().map(to_record).collect())
    }

    async fn start_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> fleetops_cloud::Result<()> {
        self.gcloud
            .start_instance(project, zone, name)
            .await
            .map_err(map_err)
    }

    async fn stop_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> fleetops_cloud::Result<()> {
        self.gcloud
            .stop_instance(project, zone, name)
            .await
            .map_err(map_err)
    }

    async fn describe_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> fleetops_cloud::Result<InstanceRecord> {
        let instance = self
            .gcloud
            .describe_instance(project, zone, name)
            .await
            .map_err(map_err)?;
        Ok(to_record(instance))
    }

    async fn list_disks(
        &self,
        project: &str,
        name_filter: Option<&str>,
    ) -> fleetops_cloud::Result<Vec<DiskRecord>> {
        let disks = self
            .gcloud
            .list_disks(project, name_filter)
            .await
            .map_err(map_err)?;
        Ok(disks
            .into_iter()
            .map(|d| DiskRecord {
                zone: d.zone_leaf(),
                name: d.name,
            })
            .collect())
    }

    async fn create_snapshot(
        &self,
        project: &str,
        zone: &str,
        disk: &str,
        name: &str,
    ) -> fleetops_cloud::Result<()> {
        self.gcloud
            .snapshot_disk(project, zone, disk, name)
            .await
            .map_err(map_err)
    }

    async fn list_snapshots(&self, project: &str) -> fleetops_cloud::Result<Vec<SnapshotRecord>> {
        let snapshots = self.gcloud.list_snapshots(project).await.map_err(map_err)?;
        Ok(snapshots
            .into_iter()
            .map(|s| SnapshotRecord {
                disk: s.source_disk_leaf(),
                status: s.status.clone(),
                name: s.name,
            })
            .collect())
    }
}
