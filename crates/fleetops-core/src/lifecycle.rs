//! Batch lifecycle controller
//!
//! Starts or stops many instances in one project as a best-effort parallel
//! fan-out, never a transaction. Zones are resolved up front from a single
//! inventory read; unresolvable names become per-instance outcomes instead
//! of aborting the batch. Destructive batches pass through a confirmation
//! gate before the first provider call is dispatched.

use crate::cache::instances_key;
use crate::error::Result;
use crate::fetch::InventoryFetcher;
use futures_util::future::join_all;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Start,
    Stop,
}

impl std::fmt::Display for PowerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerAction::Start => write!(f, "start"),
            PowerAction::Stop => write!(f, "stop"),
        }
    }
}

/// One resolvable member of a batch.
#[derive(Debug, Clone)]
pub struct Target {
    pub name: String,
    pub zone: String,
    /// IP at planning time; shown when confirming a stop.
    pub external_ip: Option<String>,
}

/// What a batch is about to do, shown to the gate before dispatch.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub action: PowerAction,
    pub project: String,
    pub targets: Vec<Target>,
    /// Requested names whose zone could not be resolved.
    pub skipped: Vec<String>,
}

/// Confirmation gate for destructive batches. The presentation shell owns
/// the act of asking; declining cancels the batch before any provider call.
pub trait BatchGate {
    fn confirm(&self, plan: &BatchPlan) -> bool;
}

/// Gate that approves everything, for non-interactive callers.
pub struct AlwaysApprove;

impl BatchGate for AlwaysApprove {
    fn confirm(&self, _plan: &BatchPlan) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Dispatched,
    ZoneNotFound,
    ProviderError(String),
}

/// Per-instance result of a batch; one entry per requested name, in
/// request order.
#[derive(Debug, Clone)]
pub struct InstanceOutcome {
    pub name: String,
    pub zone: Option<String>,
    /// For starts: the IP observed after the settling delay.
    pub external_ip: Option<String>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone)]
pub enum BatchResult {
    /// Gate declined; zero provider calls, zero cache mutation.
    Cancelled,
    Completed(Vec<InstanceOutcome>),
}

pub struct LifecycleController {
    fetcher: InventoryFetcher,
    settle_delay: Duration,
}

impl LifecycleController {
    pub fn new(fetcher: InventoryFetcher, settle_delay: Duration) -> Self {
        Self {
            fetcher,
            settle_delay,
        }
    }

    pub async fn start_many(
        &self,
        project: &str,
        names: &[String],
        force: bool,
        gate: &dyn BatchGate,
    ) -> Result<BatchResult> {
        self.run(PowerAction::Start, project, names, force, gate).await
    }

    pub async fn stop_many(
        &self,
        project: &str,
        names: &[String],
        force: bool,
        gate: &dyn BatchGate,
    ) -> Result<BatchResult> {
        self.run(PowerAction::Stop, project, names, force, gate).await
    }

    async fn run(
        &self,
        action: PowerAction,
        project: &str,
        names: &[String],
        force: bool,
        gate: &dyn BatchGate,
    ) -> Result<BatchResult> {
        // One inventory read resolves every zone up front.
        let inventory = self.fetcher.instances(project, false).await?;

        let mut targets = Vec::new();
        let mut skipped = Vec::new();
        for name in names {
            match inventory.iter().find(|i| &i.name == name) {
                Some(record) => targets.push(Target {
                    name: name.clone(),
                    zone: record.zone.clone(),
                    external_ip: record.external_ip.clone(),
                }),
                None => skipped.push(name.clone()),
            }
        }

        let plan = BatchPlan {
            action,
            project: project.to_string(),
            targets,
            skipped,
        };

        if !force && !gate.confirm(&plan) {
            tracing::info!("{} batch for {} cancelled at the gate", action, project);
            return Ok(BatchResult::Cancelled);
        }

        // Fan out one dispatch per target and join them all; a failing
        // sibling never cancels the rest.
        let provider = self.fetcher.provider().clone();
        let dispatches = plan.targets.iter().map(|target| {
            let provider = provider.clone();
            let project = project.to_string();
            async move {
                let result = match action {
                    PowerAction::Start => {
                        provider.start_instance(&project, &target.zone, &target.name).await
                    }
                    PowerAction::Stop => {
                        provider.stop_instance(&project, &target.zone, &target.name).await
                    }
                };
                match result {
                    Ok(()) => (target, Outcome::Dispatched),
                    Err(e) => {
                        tracing::warn!("{} of {} failed: {}", action, target.name, e);
                        (target, Outcome::ProviderError(e.to_string()))
                    }
                }
            }
        });
        let dispatched = join_all(dispatches).await;

        // Whole-project entries are all the cache has, so the batch stales
        // the project's inventory as a unit.
        self.fetcher.cache().invalidate(&instances_key(project)).await?;

        // Merge dispatched and skipped names back into request order, one
        // outcome per requested name.
        let mut dispatched: Vec<InstanceOutcome> = dispatched
            .into_iter()
            .map(|(target, outcome)| InstanceOutcome {
                name: target.name.clone(),
                zone: Some(target.zone.clone()),
                external_ip: target.external_ip.clone(),
                outcome,
            })
            .collect();
        let mut outcomes = Vec::with_capacity(names.len());
        for name in names {
            match dispatched.iter().position(|o| &o.name == name) {
                Some(i) => outcomes.push(dispatched.remove(i)),
                None => outcomes.push(InstanceOutcome {
                    name: name.clone(),
                    zone: None,
                    external_ip: None,
                    outcome: Outcome::ZoneNotFound,
                }),
            }
        }

        if action == PowerAction::Start {
            self.report_fresh_ips(project, &mut outcomes).await;
        }

        Ok(BatchResult::Completed(outcomes))
    }

    /// After a settling delay, re-describe each started instance straight
    /// from the provider (the cache was just invalidated) and report its
    /// newly assigned external IP. An instance still without an IP is
    /// reported without one, not retried.
    async fn report_fresh_ips(&self, project: &str, outcomes: &mut [InstanceOutcome]) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        let provider = self.fetcher.provider().clone();
        let lookups = outcomes
            .iter()
            .filter(|o| o.outcome == Outcome::Dispatched)
            .map(|o| {
                let provider = provider.clone();
                let project = project.to_string();
                let zone = o.zone.clone().unwrap_or_default();
                let name = o.name.clone();
                async move {
                    let ip = match provider.describe_instance(&project, &zone, &name).await {
                        Ok(record) => record.external_ip,
                        Err(e) => {
                            tracing::warn!("describe of {} failed: {}", name, e);
                            None
                        }
                    };
                    (name, ip)
                }
            });
        let fresh: Vec<(String, Option<String>)> = join_all(lookups).await;

        for (name, ip) in fresh {
            if let Some(outcome) = outcomes.iter_mut().find(|o| o.name == name) {
                outcome.external_ip = ip;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, instances_key};
    use fleetops_cloud::mock::{self, MockCompute};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::tempdir;

    struct Decline;
    impl BatchGate for Decline {
        fn confirm(&self, _plan: &BatchPlan) -> bool {
            false
        }
    }

    struct Recording(AtomicUsize);
    impl BatchGate for Recording {
        fn confirm(&self, _plan: &BatchPlan) -> bool {
            self.0.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    fn controller(
        provider: MockCompute,
    ) -> (tempfile::TempDir, Arc<MockCompute>, LifecycleController) {
        let dir = tempdir().unwrap();
        let cache = CacheStore::open(dir.path(), Duration::from_secs(300)).unwrap();
        let provider = Arc::new(provider);
        let fetcher = InventoryFetcher::new(provider.clone(), cache);
        (dir, provider, LifecycleController::new(fetcher, Duration::ZERO))
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn missing_zone_does_not_block_siblings() {
        let provider = MockCompute::new()
            .with_project("acme")
            .with_instance("acme", mock::instance("a", "us-east1-b", None))
            .with_instance("acme", mock::instance("c", "us-east1-c", None));
        let (_dir, provider, controller) = controller(provider);

        let result = controller
            .start_many("acme", &names(&["a", "missing-zone-b", "c"]), true, &AlwaysApprove)
            .await
            .unwrap();

        let outcomes = match result {
            BatchResult::Completed(o) => o,
            BatchResult::Cancelled => panic!("batch should not cancel"),
        };

        assert_eq!(provider.started(), vec!["a", "c"]);
        let dispatched = outcomes.iter().filter(|o| o.outcome == Outcome::Dispatched).count();
        let missing: Vec<_> = outcomes
            .iter()
            .filter(|o| o.outcome == Outcome::ZoneNotFound)
            .collect();
        assert_eq!(dispatched, 2);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "missing-zone-b");
    }

    #[tokio::test]
    async fn outcomes_follow_request_order() {
        let provider = MockCompute::new()
            .with_project("acme")
            .with_instance("acme", mock::instance("a", "us-east1-b", None))
            .with_instance("acme", mock::instance("c", "us-east1-c", None));
        let (_dir, _provider, controller) = controller(provider);

        let result = controller
            .stop_many("acme", &names(&["a", "missing-zone-b", "c"]), true, &AlwaysApprove)
            .await
            .unwrap();

        let outcomes = match result {
            BatchResult::Completed(o) => o,
            BatchResult::Cancelled => panic!("batch should not cancel"),
        };

        // An unresolvable name in the middle keeps its slot.
        let order: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(order, vec!["a", "missing-zone-b", "c"]);
        assert_eq!(outcomes[1].outcome, Outcome::ZoneNotFound);
    }

    #[tokio::test]
    async fn provider_failure_is_isolated_per_instance() {
        let provider = MockCompute::new()
            .with_project("acme")
            .with_instance("acme", mock::instance("a", "us-east1-b", None))
            .with_instance("acme", mock::instance("b", "us-east1-b", None))
            .with_failing_instance("b");
        let (_dir, provider, controller) = controller(provider);

        let result = controller
            .stop_many("acme", &names(&["a", "b"]), true, &AlwaysApprove)
            .await
            .unwrap();

        let outcomes = match result {
            BatchResult::Completed(o) => o,
            BatchResult::Cancelled => panic!("batch should not cancel"),
        };

        assert_eq!(provider.stopped(), vec!["a"]);
        assert_eq!(outcomes[0].outcome, Outcome::Dispatched);
        assert!(matches!(outcomes[1].outcome, Outcome::ProviderError(_)));
    }

    #[tokio::test]
    async fn declined_gate_makes_no_calls_and_keeps_cache() {
        let provider = MockCompute::new()
            .with_project("acme")
            .with_instance("acme", mock::instance("a", "us-east1-b", Some("1.2.3.4")));
        let (_dir, provider, controller) = controller(provider);

        // Prime the cache so we can observe that a declined batch does not
        // invalidate it.
        controller.fetcher.instances("acme", false).await.unwrap();

        let result = controller
            .stop_many("acme", &names(&["a"]), false, &Decline)
            .await
            .unwrap();

        assert!(matches!(result, BatchResult::Cancelled));
        assert!(provider.stopped().is_empty());
        let hit = controller
            .fetcher
            .cache()
            .get(&instances_key("acme"))
            .await
            .unwrap();
        assert!(hit.is_some(), "cache entry must survive a declined batch");
    }

    #[tokio::test]
    async fn force_skips_the_gate() {
        let provider = MockCompute::new()
            .with_project("acme")
            .with_instance("acme", mock::instance("a", "us-east1-b", None));
        let (_dir, _provider, controller) = controller(provider);

        let gate = Recording(AtomicUsize::new(0));
        controller
            .start_many("acme", &names(&["a"]), true, &gate)
            .await
            .unwrap();
        assert_eq!(gate.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn batch_invalidates_project_inventory() {
        let provider = MockCompute::new()
            .with_project("acme")
            .with_instance("acme", mock::instance("a", "us-east1-b", None));
        let (_dir, _provider, controller) = controller(provider);

        controller
            .stop_many("acme", &names(&["a"]), true, &AlwaysApprove)
            .await
            .unwrap();

        let hit = controller
            .fetcher
            .cache()
            .get(&instances_key("acme"))
            .await
            .unwrap();
        assert!(hit.is_none(), "dispatch must stale the whole project entry");
    }

    #[tokio::test]
    async fn start_reports_fresh_ips_from_describe() {
        let provider = MockCompute::new()
            .with_project("acme")
            .with_instance("acme", mock::instance("a", "us-east1-b", Some("35.185.1.2")));
        let (_dir, provider, controller) = controller(provider);

        let result = controller
            .start_many("acme", &names(&["a"]), true, &AlwaysApprove)
            .await
            .unwrap();

        let outcomes = match result {
            BatchResult::Completed(o) => o,
            BatchResult::Cancelled => panic!("batch should not cancel"),
        };
        assert_eq!(provider.described(), vec!["a"]);
        assert_eq!(outcomes[0].external_ip.as_deref(), Some("35.185.1.2"));
    }

    #[tokio::test]
    async fn stop_does_not_describe() {
        let provider = MockCompute::new()
            .with_project("acme")
            .with_instance("acme", mock::instance("a", "us-east1-b", None));
        let (_dir, provider, controller) = controller(provider);

        controller
            .stop_many("acme", &names(&["a"]), true, &AlwaysApprove)
            .await
            .unwrap();
        assert!(provider.described().is_empty());
    }
}
