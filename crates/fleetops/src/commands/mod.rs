pub mod aem;
pub mod cache;
pub mod find;
pub mod instances;
pub mod ip;
pub mod power;
pub mod projects;
pub mod role;
pub mod snapshot;
pub mod ssh;
pub mod url;

use crate::prompt;
use fleetops_core::{Resolution, ResolvedLocation, Resolver};

/// Shared argument handling for the commands that accept either a bare
/// instance name or an explicit (project, instance) pair. The bare form
/// runs the cross-project search and asks the operator to disambiguate.
pub async fn resolve_target(
    resolver: &Resolver,
    name: &str,
    instance: Option<&str>,
) -> anyhow::Result<ResolvedLocation> {
    match instance {
        Some(instance) => Ok(resolver.locate(name, instance).await?),
        None => match resolver.search(name).await? {
            Resolution::Resolved(location) => Ok(location),
            Resolution::Ambiguous(candidates) => prompt::pick_candidate(&candidates),
        },
    }
}
