//! Name-to-location resolution
//!
//! Maps a bare instance name, possibly ambiguous, to the (project, instance,
//! zone) triple every downstream operation consumes. The cross-project
//! search is deterministic: an exact pass in project enumeration order with
//! a first-match short-circuit, then a case-insensitive substring pass whose
//! aggregate keeps enumeration order, then listing order. Nothing here ever
//! prompts; ambiguity comes back as a candidate list and the caller hands a
//! chosen index to [`choose`].

use crate::error::{FleetError, Result};
use crate::fetch::InventoryFetcher;
use fleetops_cloud::{InstanceRecord, InstanceStatus};

/// The contract all downstream operations consume. Produced only here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub project: String,
    pub instance: String,
    pub zone: String,
}

/// One row of a disambiguation set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub project: String,
    pub instance: String,
    pub zone: String,
    pub status: InstanceStatus,
    pub external_ip: Option<String>,
}

impl Candidate {
    fn from_record(project: &str, record: &InstanceRecord) -> Self {
        Self {
            project: project.to_string(),
            instance: record.name.clone(),
            zone: record.zone.clone(),
            status: record.status.clone(),
            external_ip: record.external_ip.clone(),
        }
    }

    pub fn location(&self) -> ResolvedLocation {
        ResolvedLocation {
            project: self.project.clone(),
            instance: self.instance.clone(),
            zone: self.zone.clone(),
        }
    }
}

/// Outcome of a cross-project search.
#[derive(Debug, Clone)]
pub enum Resolution {
    Resolved(ResolvedLocation),
    /// Multiple matches, in deterministic aggregate order.
    Ambiguous(Vec<Candidate>),
}

impl Resolution {
    /// Deterministic non-interactive collapse: the first candidate in
    /// aggregate order wins. Used by batch contexts where ambiguity is
    /// tolerated by design.
    pub fn into_first(self) -> ResolvedLocation {
        match self {
            Resolution::Resolved(loc) => loc,
            Resolution::Ambiguous(candidates) => candidates[0].location(),
        }
    }
}

/// Resolve a 1-based selection against a candidate list.
pub fn choose(candidates: &[Candidate], selection: usize) -> Result<ResolvedLocation> {
    if selection == 0 || selection > candidates.len() {
        return Err(FleetError::InvalidSelection {
            given: selection,
            max: candidates.len(),
        });
    }
    Ok(candidates[selection - 1].location())
}

pub struct Resolver {
    fetcher: InventoryFetcher,
    dispatcher_token: String,
}

impl Resolver {
    pub fn new(fetcher: InventoryFetcher, dispatcher_token: impl Into<String>) -> Self {
        Self {
            fetcher,
            dispatcher_token: dispatcher_token.into().to_lowercase(),
        }
    }

    /// Two-argument form: the project is known, only the zone is missing.
    pub async fn locate(&self, project: &str, instance: &str) -> Result<ResolvedLocation> {
        self.record(project, instance).await.map(|record| ResolvedLocation {
            project: project.to_string(),
            instance: record.name,
            zone: record.zone,
        })
    }

    /// Like [`locate`] but returns the full inventory record, for callers
    /// that also need IPs or status.
    ///
    /// [`locate`]: Resolver::locate
    pub async fn record(&self, project: &str, instance: &str) -> Result<InstanceRecord> {
        let inventory = self.fetcher.instances(project, false).await?;
        inventory
            .into_iter()
            .find(|i| i.name == instance)
            .ok_or_else(|| FleetError::InstanceNotFoundInProject {
                project: project.to_string(),
                instance: instance.to_string(),
            })
    }

    /// Full cross-project search for a bare name.
    pub async fn search(&self, query: &str) -> Result<Resolution> {
        self.search_excluding(query, None).await
    }

    /// Author-tier search: dispatcher-class hosts are structurally out of
    /// reach for this endpoint, so matching candidates are dropped. A raw
    /// query that itself carries the dispatcher token is rejected before
    /// any cache or provider access.
    pub async fn search_author(&self, query: &str) -> Result<Resolution> {
        if query.to_lowercase().contains(&self.dispatcher_token) {
            return Err(FleetError::WrongRole(query.to_string()));
        }
        self.search_excluding(query, Some(&self.dispatcher_token)).await
    }

    async fn search_excluding(
        &self,
        query: &str,
        exclude_token: Option<&str>,
    ) -> Result<Resolution> {
        let projects = self.fetcher.projects(false).await?;

        // Exact pass: first matching project wins, later projects are never
        // fetched. Inventories seen along the way are kept for the partial
        // pass so each project is listed at most once.
        let mut seen: Vec<(String, Vec<InstanceRecord>)> = Vec::new();
        for project in &projects {
            let inventory = match self.fetcher.instances(&project.id, false).await {
                Ok(list) => list,
                Err(FleetError::ProviderUnavailable(e)) => {
                    // One unreachable project must not sink the whole scan.
                    tracing::warn!("skipping project {}: {}", project.id, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(record) = inventory.iter().find(|i| i.name == query) {
                return Ok(Resolution::Resolved(ResolvedLocation {
                    project: project.id.clone(),
                    instance: record.name.clone(),
                    zone: record.zone.clone(),
                }));
            }
            seen.push((project.id.clone(), inventory));
        }

        // Partial pass: aggregate case-insensitive substring matches in
        // enumeration order, then listing order. Never re-sorted.
        let needle = query.to_lowercase();
        let mut candidates = Vec::new();
        for (project, inventory) in &seen {
            for record in inventory {
                let name = record.name.to_lowercase();
                if !name.contains(&needle) {
                    continue;
                }
                if let Some(token) = exclude_token {
                    if name.contains(token) {
                        continue;
                    }
                }
                candidates.push(Candidate::from_record(project, record));
            }
        }

        match candidates.len() {
            0 => Err(FleetError::NotFound(query.to_string())),
            1 => Ok(Resolution::Resolved(candidates.remove(0).location())),
            _ => Ok(Resolution::Ambiguous(candidates)),
        }
    }

    /// Role fan-out: every instance in one project whose name contains the
    /// role token, case-insensitively. Multiplicity is the intended
    /// outcome, so this never prompts and never errors on many matches.
    pub async fn find_by_role(&self, project: &str, role: &str) -> Result<Vec<String>> {
        let needle = role.to_lowercase();
        Ok(self
            .fetcher
            .instances(project, false)
            .await?
            .into_iter()
            .filter(|i| i.name.to_lowercase().contains(&needle))
            .map(|i| i.name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use fleetops_cloud::mock::{self, MockCompute};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    fn resolver(provider: MockCompute) -> (tempfile::TempDir, Arc<MockCompute>, Resolver) {
        let dir = tempdir().unwrap();
        let cache = CacheStore::open(dir.path(), Duration::from_secs(300)).unwrap();
        let provider = Arc::new(provider);
        let fetcher = InventoryFetcher::new(provider.clone(), cache);
        (dir, provider, Resolver::new(fetcher, "dispatcher"))
    }

    #[tokio::test]
    async fn exact_match_short_circuits_remaining_projects() {
        let provider = MockCompute::new()
            .with_project("alpha")
            .with_project("bravo")
            .with_project("charlie")
            .with_instance("bravo", mock::instance("web-1", "us-east1-b", None))
            .with_instance("charlie", mock::instance("web-1-old", "us-west1-a", None));
        let (_dir, provider, resolver) = resolver(provider);

        let resolution = resolver.search("web-1").await.unwrap();
        let location = resolution.into_first();
        assert_eq!(location.project, "bravo");
        assert_eq!(location.zone, "us-east1-b");

        // Short-circuit: charlie's inventory was never enumerated.
        assert_eq!(provider.instance_list_calls("alpha"), 1);
        assert_eq!(provider.instance_list_calls("bravo"), 1);
        assert_eq!(provider.instance_list_calls("charlie"), 0);
    }

    #[tokio::test]
    async fn partial_matches_keep_enumeration_order() {
        let provider = MockCompute::new()
            .with_project("alpha")
            .with_project("bravo")
            .with_instance("alpha", mock::instance("prod-author-1", "us-east1-b", None))
            .with_instance("bravo", mock::instance("prod-author-2", "europe-west1-d", None));
        let (_dir, _provider, resolver) = resolver(provider);

        let resolution = resolver.search("Author").await.unwrap();
        match resolution {
            Resolution::Ambiguous(candidates) => {
                let names: Vec<&str> = candidates.iter().map(|c| c.instance.as_str()).collect();
                assert_eq!(names, vec!["prod-author-1", "prod-author-2"]);
                assert_eq!(candidates[0].project, "alpha");
                assert_eq!(candidates[1].project, "bravo");
            }
            other => panic!("expected ambiguous resolution, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn single_partial_match_resolves_without_candidates() {
        let provider = MockCompute::new()
            .with_project("alpha")
            .with_instance("alpha", mock::instance("prod-publish-1", "us-east1-b", None));
        let (_dir, _provider, resolver) = resolver(provider);

        let resolution = resolver.search("publish").await.unwrap();
        assert!(matches!(resolution, Resolution::Resolved(_)));
    }

    #[tokio::test]
    async fn no_match_is_not_found() {
        let provider = MockCompute::new().with_project("alpha");
        let (_dir, _provider, resolver) = resolver(provider);

        let err = resolver.search("ghost").await.unwrap_err();
        assert!(matches!(err, FleetError::NotFound(_)));
    }

    #[tokio::test]
    async fn unreachable_project_degrades_instead_of_aborting() {
        let provider = MockCompute::new()
            .with_project("broken")
            .with_project("alpha")
            .with_failing_project("broken")
            .with_instance("alpha", mock::instance("web-1", "us-east1-b", None));
        let (_dir, _provider, resolver) = resolver(provider);

        let location = resolver.search("web-1").await.unwrap().into_first();
        assert_eq!(location.project, "alpha");
    }

    #[tokio::test]
    async fn locate_fails_in_wrong_project() {
        let provider = MockCompute::new()
            .with_project("alpha")
            .with_instance("alpha", mock::instance("web-1", "us-east1-b", None));
        let (_dir, _provider, resolver) = resolver(provider);

        let err = resolver.locate("alpha", "web-2").await.unwrap_err();
        assert!(matches!(err, FleetError::InstanceNotFoundInProject { .. }));
    }

    #[tokio::test]
    async fn find_by_role_returns_all_matches() {
        let provider = MockCompute::new()
            .with_project("alpha")
            .with_instance("alpha", mock::instance("prod-author-1", "us-east1-b", None))
            .with_instance("alpha", mock::instance("prod-author-2", "us-east1-b", None))
            .with_instance("alpha", mock::instance("prod-dispatcher-1", "us-east1-b", None));
        let (_dir, _provider, resolver) = resolver(provider);

        let hosts = resolver.find_by_role("alpha", "author").await.unwrap();
        assert_eq!(hosts, vec!["prod-author-1", "prod-author-2"]);
    }

    #[tokio::test]
    async fn author_search_rejects_dispatcher_query_before_any_call() {
        let provider = MockCompute::new().with_project("alpha");
        let (_dir, provider, resolver) = resolver(provider);

        let err = resolver.search_author("prod-dispatcher-3").await.unwrap_err();
        assert!(matches!(err, FleetError::WrongRole(_)));
        assert_eq!(provider.total_calls(), 0);

        // Literal legacy behavior: a pathological author name carrying the
        // token is rejected up front too.
        let err = resolver
            .search_author("prod-dispatcher-3-author")
            .await
            .unwrap_err();
        assert!(matches!(err, FleetError::WrongRole(_)));
        assert_eq!(provider.total_calls(), 0);
    }

    #[tokio::test]
    async fn author_search_filters_dispatcher_candidates() {
        let provider = MockCompute::new()
            .with_project("alpha")
            .with_instance("alpha", mock::instance("prod-author-1", "us-east1-b", None))
            .with_instance("alpha", mock::instance("prod-dispatcher-1", "us-east1-b", None));
        let (_dir, _provider, resolver) = resolver(provider);

        // "prod" substring-matches both, but the dispatcher is excluded.
        let location = resolver.search_author("prod").await.unwrap().into_first();
        assert_eq!(location.instance, "prod-author-1");
    }

    #[tokio::test]
    async fn choose_validates_selection_range() {
        let candidates = vec![
            Candidate {
                project: "alpha".into(),
                instance: "a-1".into(),
                zone: "us-east1-b".into(),
                status: fleetops_cloud::InstanceStatus::Running,
                external_ip: None,
            },
            Candidate {
                project: "bravo".into(),
                instance: "a-2".into(),
                zone: "us-west1-a".into(),
                status: fleetops_cloud::InstanceStatus::Running,
                external_ip: None,
            },
        ];

        assert_eq!(choose(&candidates, 2).unwrap().project, "bravo");
        assert!(matches!(choose(&candidates, 0), Err(FleetError::InvalidSelection { .. })));
        assert!(matches!(choose(&candidates, 3), Err(FleetError::InvalidSelection { .. })));
    }
}
