//! Inventory fetcher
//!
//! The single component allowed to write cache entries. Reads serve from
//! the cache while fresh and fall back to a live control-plane fetch that
//! overwrites the entry wholesale; there is no incremental merge anywhere.

use crate::cache::{self, CacheStore, PROJECTS_KEY};
use crate::error::{FleetError, Result};
use fleetops_cloud::{ComputeProvider, DiskRecord, InstanceRecord, Project};
use std::sync::Arc;

#[derive(Clone)]
pub struct InventoryFetcher {
    provider: Arc<dyn ComputeProvider>,
    cache: CacheStore,
}

impl InventoryFetcher {
    pub fn new(provider: Arc<dyn ComputeProvider>, cache: CacheStore) -> Self {
        Self { provider, cache }
    }

    pub fn provider(&self) -> &Arc<dyn ComputeProvider> {
        &self.provider
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Accessible projects, cache-or-fetch. `refresh` bypasses the cache.
    pub async fn projects(&self, refresh: bool) -> Result<Vec<Project>> {
        if !refresh {
            if let Some(hit) = self.cache.get(PROJECTS_KEY).await? {
                if hit.fresh {
                    return Ok(hit.rows.iter().filter_map(|r| cache::decode_project(r)).collect());
                }
            }
        }

        let projects = self
            .provider
            .list_projects()
            .await
            .map_err(|e| FleetError::ProviderUnavailable(e.to_string()))?;

        let rows: Vec<String> = projects.iter().map(cache::encode_project).collect();
        self.cache.put(PROJECTS_KEY, &rows).await?;
        tracing::debug!("fetched {} projects", projects.len());
        Ok(projects)
    }

    /// Whole-project instance inventory, cache-or-fetch.
    pub async fn instances(&self, project: &str, refresh: bool) -> Result<Vec<InstanceRecord>> {
        let key = cache::instances_key(project);

        if !refresh {
            if let Some(hit) = self.cache.get(&key).await? {
                if hit.fresh {
                    return Ok(hit.rows.iter().filter_map(|r| cache::decode_instance(r)).collect());
                }
            }
        }

        let instances = self
            .provider
            .list_instances(project)
            .await
            .map_err(|e| FleetError::ProviderUnavailable(e.to_string()))?;

        let rows: Vec<String> = instances.iter().map(cache::encode_instance).collect();
        self.cache.put(&key, &rows).await?;
        tracing::debug!("fetched {} instances for {}", instances.len(), project);
        Ok(instances)
    }

    /// Disks are never cached; this passes straight through to the provider.
    pub async fn disks(&self, project: &str, name_filter: Option<&str>) -> Result<Vec<DiskRecord>> {
        self.provider
            .list_disks(project, name_filter)
            .await
            .map_err(|e| FleetError::ProviderUnavailable(e.to_string()))
    }
}
