use crate::prompt;
use colored::Colorize;
use fleetops_core::{Resolution, Resolver};

pub async fn handle(resolver: &Resolver, name: &str) -> anyhow::Result<()> {
    let location = match resolver.search(name).await? {
        Resolution::Resolved(location) => location,
        Resolution::Ambiguous(candidates) => prompt::pick_candidate(&candidates)?,
    };

    println!(
        "{} {} {} {}",
        location.instance.cyan().bold(),
        format!("project={}", location.project),
        format!("zone={}", location.zone),
        "✓".green()
    );

    Ok(())
}
