use colored::Colorize;
use fleetops_core::InventoryFetcher;

pub async fn handle(fetcher: &InventoryFetcher, project: &str) -> anyhow::Result<()> {
    let instances = fetcher.instances(project, false).await?;

    if instances.is_empty() {
        println!("{}", format!("No instances in {}", project).dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{:<30} {:<14} {:<12} {:<16} {:<16} {:<20}",
            "NAME", "ZONE", "STATUS", "EXTERNAL IP", "INTERNAL IP", "MACHINE TYPE"
        )
        .bold()
    );
    println!("{}", "─".repeat(110).dimmed());

    for instance in instances {
        let status = instance.status.to_string();
        let status_colored = if instance.status.is_running() {
            status.green()
        } else {
            status.red()
        };

        println!(
            "{:<30} {:<14} {:<12} {:<16} {:<16} {:<20}",
            instance.name.cyan(),
            instance.zone,
            status_colored,
            instance.external_ip.as_deref().unwrap_or("-"),
            instance.internal_ip,
            instance.machine_type.dimmed()
        );
    }

    Ok(())
}
