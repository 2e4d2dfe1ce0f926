//! Resolution, caching and lifecycle core for FleetOps
//!
//! Everything an operator-facing shell needs to manage VM fleets across many
//! isolated projects: a durable TTL inventory cache, a write-through fetcher,
//! the name-to-location resolver, the concurrent batch start/stop controller
//! and the snapshot orchestrator. Presentation (colors, prompts, tables,
//! browser/SSH launch) lives outside this crate and talks to it through the
//! typed results returned here.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod lifecycle;
pub mod resolve;
pub mod snapshot;

pub use cache::{CacheHit, CacheStore};
pub use config::ConsoleConfig;
pub use error::{FleetError, Result};
pub use fetch::InventoryFetcher;
pub use lifecycle::{
    BatchGate, BatchPlan, BatchResult, InstanceOutcome, LifecycleController, Outcome, PowerAction,
    Target,
};
pub use resolve::{Candidate, ResolvedLocation, Resolution, Resolver, choose};
pub use snapshot::{SnapshotOrchestrator, SnapshotReport};
