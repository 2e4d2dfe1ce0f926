//! Scripted in-memory provider for tests
//!
//! Serves fixed inventories, records every control-plane call, and can be
//! told to fail specific projects, instances or snapshot requests. Call
//! counters let tests assert which projects were actually enumerated.

use crate::error::{CloudError, Result};
use crate::provider::ComputeProvider;
use crate::record::{DiskRecord, InstanceRecord, InstanceStatus, Project, ProjectState,
    SnapshotRecord};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct CallLog {
    list_projects: usize,
    list_instances: HashMap<String, usize>,
    starts: Vec<(String, String, String)>,
    stops: Vec<(String, String, String)>,
    describes: Vec<(String, String, String)>,
    snapshots: Vec<(String, String, String, String)>,
}

/// In-memory [`ComputeProvider`] with scripted data and failure injection.
#[derive(Default)]
pub struct MockCompute {
    projects: Vec<Project>,
    instances: HashMap<String, Vec<InstanceRecord>>,
    disks: HashMap<String, Vec<DiskRecord>>,
    snapshots: HashMap<String, Vec<SnapshotRecord>>,
    failing_projects: HashSet<String>,
    failing_instances: HashSet<String>,
    fail_snapshots: bool,
    log: Mutex<CallLog>,
}

impl MockCompute {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project; enumeration order is registration order.
    pub fn with_project(mut self, id: &str) -> Self {
        self.projects.push(Project {
            id: id.to_string(),
            name: id.to_string(),
            lifecycle_state: ProjectState::Active,
        });
        self.instances.entry(id.to_string()).or_default();
        self
    }

    pub fn with_instance(mut self, project: &str, record: InstanceRecord) -> Self {
        self.instances
            .entry(project.to_string())
            .or_default()
            .push(record);
        self
    }

    pub fn with_disk(mut self, project: &str, name: &str, zone: &str) -> Self {
        self.disks.entry(project.to_string()).or_default().push(DiskRecord {
            name: name.to_string(),
            zone: zone.to_string(),
        });
        self
    }

    /// Make every listing call against one project fail.
    pub fn with_failing_project(mut self, project: &str) -> Self {
        self.failing_projects.insert(project.to_string());
        self
    }

    /// Make start/stop of one instance fail.
    pub fn with_failing_instance(mut self, name: &str) -> Self {
        self.failing_instances.insert(name.to_string());
        self
    }

    pub fn with_snapshot_failure(mut self) -> Self {
        self.fail_snapshots = true;
        self
    }

    pub fn project_list_calls(&self) -> usize {
        self.log.lock().unwrap().list_projects
    }

    /// How many times one project's inventory was listed.
    pub fn instance_list_calls(&self, project: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .list_instances
            .get(project)
            .copied()
            .unwrap_or(0)
    }

    /// Names passed to `start_instance`, in dispatch order.
    pub fn started(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .starts
            .iter()
            .map(|(_, _, name)| name.clone())
            .collect()
    }

    pub fn stopped(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .stops
            .iter()
            .map(|(_, _, name)| name.clone())
            .collect()
    }

    pub fn described(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .describes
            .iter()
            .map(|(_, _, name)| name.clone())
            .collect()
    }

    pub fn snapshots_created(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .snapshots
            .iter()
            .map(|(_, _, _, name)| name.clone())
            .collect()
    }

    pub fn total_calls(&self) -> usize {
        let log = self.log.lock().unwrap();
        log.list_projects
            + log.list_instances.values().sum::<usize>()
            + log.starts.len()
            + log.stops.len()
            + log.describes.len()
            + log.snapshots.len()
    }
}

/// Shorthand for building instance records in tests.
pub fn instance(name: &str, zone: &str, external_ip: Option<&str>) -> InstanceRecord {
    InstanceRecord {
        name: name.to_string(),
        zone: zone.to_string(),
        status: InstanceStatus::Running,
        external_ip: external_ip.map(str::to_string),
        internal_ip: "10.0.0.2".to_string(),
        machine_type: "n1-standard-4".to_string(),
    }
}

#[async_trait]
impl ComputeProvider for MockCompute {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.log.lock().unwrap().list_projects += 1;
        Ok(self.projects.clone())
    }

    async fn list_instances(&self, project: &str) -> Result<Vec<InstanceRecord>> {
        *self
            .log
            .lock()
            .unwrap()
            .list_instances
            .entry(project.to_string())
            .or_insert(0) += 1;
        if self.failing_projects.contains(project) {
            return Err(CloudError::ApiError(format!("injected failure for {}", project)));
        }
        Ok(self.instances.get(project).cloned().unwrap_or_default())
    }

    async fn start_instance(&self, project: &str, zone: &str, name: &str) -> Result<()> {
        if self.failing_instances.contains(name) {
            return Err(CloudError::ApiError(format!("injected start failure for {}", name)));
        }
        self.log.lock().unwrap().starts.push((
            project.to_string(),
            zone.to_string(),
            name.to_string(),
        ));
        Ok(())
    }

    async fn stop_instance(&self, project: &str, zone: &str, name: &str) -> Result<()> {
        if self.failing_instances.contains(name) {
            return Err(CloudError::ApiError(format!("injected stop failure for {}", name)));
        }
        self.log.lock().unwrap().stops.push((
            project.to_string(),
            zone.to_string(),
            name.to_string(),
        ));
        Ok(())
    }

    async fn describe_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<InstanceRecord> {
        self.log.lock().unwrap().describes.push((
            project.to_string(),
            zone.to_string(),
            name.to_string(),
        ));
        self.instances
            .get(project)
            .and_then(|list| list.iter().find(|i| i.name == name))
            .cloned()
            .ok_or_else(|| CloudError::ResourceNotFound(name.to_string()))
    }

    async fn list_disks(
        &self,
        project: &str,
        name_filter: Option<&str>,
    ) -> Result<Vec<DiskRecord>> {
        if self.failing_projects.contains(project) {
            return Err(CloudError::ApiError(format!("injected failure for {}", project)));
        }
        let disks = self.disks.get(project).cloned().unwrap_or_default();
        Ok(match name_filter {
            Some(name) => disks.into_iter().filter(|d| d.name == name).collect(),
            None => disks,
        })
    }

    async fn create_snapshot(
        &self,
        project: &str,
        zone: &str,
        disk: &str,
        name: &str,
    ) -> Result<()> {
        if self.fail_snapshots {
            return Err(CloudError::ApiError("injected snapshot failure".to_string()));
        }
        self.log.lock().unwrap().snapshots.push((
            project.to_string(),
            zone.to_string(),
            disk.to_string(),
            name.to_string(),
        ));
        Ok(())
    }

    async fn list_snapshots(&self, project: &str) -> Result<Vec<SnapshotRecord>> {
        Ok(self.snapshots.get(project).cloned().unwrap_or_default())
    }
}
