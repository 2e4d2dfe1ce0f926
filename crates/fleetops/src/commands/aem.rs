use crate::prompt;
use colored::Colorize;
use fleetops_core::{Resolution, Resolver};

/// AEM author login shortcut. The author-tier search refuses dispatcher
/// hosts outright, so this can only land on an authoring endpoint.
pub async fn handle(resolver: &Resolver, name: &str) -> anyhow::Result<()> {
    let location = match resolver.search_author(name).await? {
        Resolution::Resolved(location) => location,
        Resolution::Ambiguous(candidates) => prompt::pick_candidate(&candidates)?,
    };

    let record = resolver.record(&location.project, &location.instance).await?;
    let ip = record
        .external_ip
        .ok_or_else(|| anyhow::anyhow!("{} has no external IP", location.instance))?;

    let url = format!("http://{}:4502", ip);
    println!(
        "{} {}",
        format!("Opening author login for {}:", location.instance).blue(),
        url.cyan()
    );
    open::that(&url)?;
    Ok(())
}
