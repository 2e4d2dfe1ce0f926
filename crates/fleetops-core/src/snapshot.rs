//! Snapshot orchestration
//!
//! Disks live outside the cached instance inventory, so zone resolution is
//! a live disk-list call filtered to the exact disk name. One synchronous
//! snapshot request per invocation; a failure is terminal, never retried.

use crate::error::{FleetError, Result};
use crate::fetch::InventoryFetcher;
use chrono::Utc;
use fleetops_cloud::SnapshotRecord;

#[derive(Debug, Clone)]
pub struct SnapshotReport {
    pub snapshot: String,
    pub disk: String,
    pub zone: String,
}

pub struct SnapshotOrchestrator {
    fetcher: InventoryFetcher,
}

impl SnapshotOrchestrator {
    pub fn new(fetcher: InventoryFetcher) -> Self {
        Self { fetcher }
    }

    /// Snapshot a disk. Zone and snapshot name are resolved when omitted:
    /// the zone from a filtered disk list, the name as
    /// `<disk>-snap-<UTC timestamp>`.
    pub async fn snapshot(
        &self,
        project: &str,
        disk: &str,
        zone: Option<&str>,
        name: Option<&str>,
    ) -> Result<SnapshotReport> {
        let zone = match zone {
            Some(z) => z.to_string(),
            None => self
                .fetcher
                .disks(project, Some(disk))
                .await?
                .into_iter()
                .find(|d| d.name == disk)
                .map(|d| d.zone)
                .ok_or_else(|| FleetError::ZoneNotFound(disk.to_string()))?,
        };

        let snapshot = match name {
            Some(n) => n.to_string(),
            None => format!("{}-snap-{}", disk, Utc::now().format("%Y%m%d%H%M%S")),
        };

        tracing::debug!("snapshotting {}/{} in {} as {}", project, disk, zone, snapshot);
        self.fetcher
            .provider()
            .create_snapshot(project, &zone, disk, &snapshot)
            .await
            .map_err(|e| FleetError::SnapshotFailed(e.to_string()))?;

        Ok(SnapshotReport {
            snapshot,
            disk: disk.to_string(),
            zone,
        })
    }

    pub async fn list(&self, project: &str) -> Result<Vec<SnapshotRecord>> {
        self.fetcher
            .provider()
            .list_snapshots(project)
            .await
            .map_err(|e| FleetError::ProviderUnavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use fleetops_cloud::mock::MockCompute;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    fn orchestrator(
        provider: MockCompute,
    ) -> (tempfile::TempDir, Arc<MockCompute>, SnapshotOrchestrator) {
        let dir = tempdir().unwrap();
        let cache = CacheStore::open(dir.path(), Duration::from_secs(300)).unwrap();
        let provider = Arc::new(provider);
        let fetcher = InventoryFetcher::new(provider.clone(), cache);
        (dir, provider, SnapshotOrchestrator::new(fetcher))
    }

    #[tokio::test]
    async fn resolves_zone_from_disk_list() {
        let provider = MockCompute::new()
            .with_project("acme")
            .with_disk("acme", "author-data", "us-east1-b");
        let (_dir, provider, orchestrator) = orchestrator(provider);

        let report = orchestrator
            .snapshot("acme", "author-data", None, Some("manual-snap"))
            .await
            .unwrap();

        assert_eq!(report.zone, "us-east1-b");
        assert_eq!(provider.snapshots_created(), vec!["manual-snap"]);
    }

    #[tokio::test]
    async fn unknown_disk_is_zone_not_found() {
        let provider = MockCompute::new().with_project("acme");
        let (_dir, _provider, orchestrator) = orchestrator(provider);

        let err = orchestrator
            .snapshot("acme", "ghost-disk", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, FleetError::ZoneNotFound(_)));
    }

    #[tokio::test]
    async fn generates_timestamped_name() {
        let provider = MockCompute::new()
            .with_project("acme")
            .with_disk("acme", "author-data", "us-east1-b");
        let (_dir, _provider, orchestrator) = orchestrator(provider);

        let report = orchestrator
            .snapshot("acme", "author-data", Some("us-east1-b"), None)
            .await
            .unwrap();

        assert!(report.snapshot.starts_with("author-data-snap-"));
        let stamp = &report.snapshot["author-data-snap-".len()..];
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn provider_failure_is_snapshot_failed() {
        let provider = MockCompute::new()
            .with_project("acme")
            .with_disk("acme", "author-data", "us-east1-b")
            .with_snapshot_failure();
        let (_dir, _provider, orchestrator) = orchestrator(provider);

        let err = orchestrator
            .snapshot("acme", "author-data", Some("us-east1-b"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, FleetError::SnapshotFailed(_)));
    }
}
