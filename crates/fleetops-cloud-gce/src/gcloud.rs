//! gcloud CLI wrapper
//!
//! Wraps the gcloud CLI commands for Compute Engine operations. Every
//! listing call asks for `--format=json` and deserializes the control
//! plane's own field names; zone and machine type arrive as full resource
//! URLs and are trimmed to their last path segment.

use crate::error::{GceError, Result};
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;

/// gcloud CLI wrapper
pub struct Gcloud;

impl Gcloud {
    pub fn new() -> Self {
        Self
    }

    /// Run a gcloud command and return stdout.
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("gcloud");
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: gcloud {}", args.join(" "));

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GceError::GcloudNotFound
            } else {
                GceError::IoError(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GceError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn parse_list<T: serde::de::DeserializeOwned>(output: &str) -> Result<Vec<T>> {
        if output.trim().is_empty() || output.trim() == "[]" {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(output)?)
    }

    /// List all projects the active credentials can see.
    pub async fn list_projects(&self) -> Result<Vec<GceProjectInfo>> {
        let output = self
            .run_command(&["projects", "list", "--format=json"])
            .await?;
        Self::parse_list(&output)
    }

    /// List all instances in a project.
    pub async fn list_instances(&self, project: &str) -> Result<Vec<GceInstance>> {
        let output = self
            .run_command(&[
                "compute",
                "instances",
                "list",
                "--project",
                project,
                "--format=json",
            ])
            .await?;
        Self::parse_list(&output)
    }

    /// Describe a single instance.
    pub async fn describe_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<GceInstance> {
        let output = self
            .run_command(&[
                "compute",
                "instances",
                "describe",
                name,
                "--project",
                project,
                "--zone",
                zone,
                "--format=json",
            ])
            .await?;
        let instance: GceInstance = serde_json::from_str(&output)?;
        Ok(instance)
    }

    /// Start an instance. `--async` returns as soon as the request is
    /// accepted; completion is never awaited here.
    pub async fn start_instance(&self, project: &str, zone: &str, name: &str) -> Result<()> {
        self.run_command(&[
            "compute", "instances", "start", name, "--project", project, "--zone", zone,
            "--async", "--quiet",
        ])
        .await?;
        Ok(())
    }

    /// Stop an instance, dispatch-only like [`start_instance`].
    ///
    /// [`start_instance`]: Gcloud::start_instance
    pub async fn stop_instance(&self, project: &str, zone: &str, name: &str) -> Result<()> {
        self.run_command(&[
            "compute", "instances", "stop", name, "--project", project, "--zone", zone,
            "--async", "--quiet",
        ])
        .await?;
        Ok(())
    }

    /// List disks, optionally filtered to an exact name.
    pub async fn list_disks(
        &self,
        project: &str,
        name_filter: Option<&str>,
    ) -> Result<Vec<GceDisk>> {
        let filter;
        let mut args = vec!["compute", "disks", "list", "--project", project, "--format=json"];
        if let Some(name) = name_filter {
            filter = format!("--filter=name={}", name);
            args.push(filter.as_str());
        }
        let output = self.run_command(&args).await?;
        Self::parse_list(&output)
    }

    /// Snapshot a disk. Synchronous: gcloud blocks until the snapshot
    /// request has completed or failed.
    pub async fn snapshot_disk(
        &self,
        project: &str,
        zone: &str,
        disk: &str,
        snapshot_name: &str,
    ) -> Result<()> {
        let names = format!("--snapshot-names={}", snapshot_name);
        self.run_command(&[
            "compute", "disks", "snapshot", disk, "--project", project, "--zone", zone,
            names.as_str(), "--quiet",
        ])
        .await?;
        Ok(())
    }

    /// List snapshots in a project.
    pub async fn list_snapshots(&self, project: &str) -> Result<Vec<GceSnapshot>> {
        let output = self
            .run_command(&[
                "compute",
                "snapshots",
                "list",
                "--project",
                project,
                "--format=json",
            ])
            .await?;
        Self::parse_list(&output)
    }
}

impl Default for Gcloud {
    fn default() -> Self {
        Self::new()
    }
}

/// Take the last path segment of a resource URL, e.g.
/// ".../zones/us-east1-b" -> "us-east1-b".
fn url_leaf(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}

/// Project information from the control plane
#[derive(Debug, Clone, Deserialize)]
pub struct GceProjectInfo {
    #[serde(rename = "projectId")]
    pub project_id: String,

    #[serde(rename = "name", default)]
    pub name: String,

    #[serde(rename = "lifecycleState", default)]
    pub lifecycle_state: String,
}

/// Instance information from the control plane
#[derive(Debug, Clone, Deserialize)]
pub struct GceInstance {
    pub name: String,

    /// Full zone resource URL
    pub zone: String,

    pub status: String,

    #[serde(rename = "machineType")]
    pub machine_type: String,

    #[serde(rename = "networkInterfaces", default)]
    pub network_interfaces: Vec<GceNetworkInterface>,
}

impl GceInstance {
    pub fn zone_leaf(&self) -> String {
        url_leaf(&self.zone)
    }

    pub fn machine_type_leaf(&self) -> String {
        url_leaf(&self.machine_type)
    }

    /// NAT IP of the first access config, if the instance has one.
    pub fn external_ip(&self) -> Option<String> {
        self.network_interfaces
            .iter()
            .flat_map(|i| i.access_configs.iter())
            .find_map(|a| a.nat_ip.clone())
    }

    pub fn internal_ip(&self) -> Option<String> {
        self.network_interfaces
            .iter()
            .find_map(|i| i.network_ip.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GceNetworkInterface {
    #[serde(rename = "networkIP")]
    pub network_ip: Option<String>,

    #[serde(rename = "accessConfigs", default)]
    pub access_configs: Vec<GceAccessConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GceAccessConfig {
    #[serde(rename = "natIP")]
    pub nat_ip: Option<String>,
}

/// Disk information from the control plane
#[derive(Debug, Clone, Deserialize)]
pub struct GceDisk {
    pub name: String,

    /// Full zone resource URL
    pub zone: String,
}

impl GceDisk {
    pub fn zone_leaf(&self) -> String {
        url_leaf(&self.zone)
    }
}

/// Snapshot information from the control plane
#[derive(Debug, Clone, Deserialize)]
pub struct GceSnapshot {
    pub name: String,

    #[serde(rename = "sourceDisk", default)]
    pub source_disk: String,

    #[serde(default)]
    pub status: String,
}

impl GceSnapshot {
    pub fn source_disk_leaf(&self) -> String {
        url_leaf(&self.source_disk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_url_fields() {
        let raw = r#"{
            "name": "prod-author-1",
            "zone": "https://www.googleapis.com/compute/v1/projects/p/zones/us-east1-b",
            "status": "RUNNING",
            "machineType": "https://www.googleapis.com/compute/v1/projects/p/zones/us-east1-b/machineTypes/n1-standard-4",
            "networkInterfaces": [
                {
                    "networkIP": "10.142.0.3",
                    "accessConfigs": [{"natIP": "35.185.1.2"}]
                }
            ]
        }"#;

        let instance: GceInstance = serde_json::from_str(raw).unwrap();
        assert_eq!(instance.zone_leaf(), "us-east1-b");
        assert_eq!(instance.machine_type_leaf(), "n1-standard-4");
        assert_eq!(instance.external_ip(), Some("35.185.1.2".to_string()));
        assert_eq!(instance.internal_ip(), Some("10.142.0.3".to_string()));
    }

    #[test]
    fn test_instance_without_external_ip() {
        let raw = r#"{
            "name": "prod-publish-2",
            "zone": "projects/p/zones/europe-west1-d",
            "status": "TERMINATED",
            "machineType": "zones/europe-west1-d/machineTypes/e2-medium",
            "networkInterfaces": [{"networkIP": "10.132.0.9", "accessConfigs": []}]
        }"#;

        let instance: GceInstance = serde_json::from_str(raw).unwrap();
        assert_eq!(instance.external_ip(), None);
        assert_eq!(instance.internal_ip(), Some("10.132.0.9".to_string()));
    }

    #[test]
    fn test_empty_list_output() {
        let disks: Vec<GceDisk> = Gcloud::parse_list("[]").unwrap();
        assert!(disks.is_empty());
        let disks: Vec<GceDisk> = Gcloud::parse_list("  \n").unwrap();
        assert!(disks.is_empty());
    }
}
