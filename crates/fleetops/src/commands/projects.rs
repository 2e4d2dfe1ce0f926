use colored::Colorize;
use fleetops_core::InventoryFetcher;

pub async fn handle(fetcher: &InventoryFetcher) -> anyhow::Result<()> {
    let projects = fetcher.projects(false).await?;

    if projects.is_empty() {
        println!("{}", "No accessible projects".dimmed());
        return Ok(());
    }

    println!("{}", format!("{:<30} {:<30} {:<20}", "PROJECT", "NAME", "STATE").bold());
    println!("{}", "─".repeat(80).dimmed());
    for project in projects {
        println!(
            "{:<30} {:<30} {:<20}",
            project.id.cyan(),
            project.name,
            project.lifecycle_state.to_string()
        );
    }

    Ok(())
}
