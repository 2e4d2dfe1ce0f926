use colored::Colorize;
use fleetops_core::SnapshotOrchestrator;

pub async fn handle(
    orchestrator: &SnapshotOrchestrator,
    project: &str,
    disk: &str,
    zone: Option<&str>,
    name: Option<&str>,
) -> anyhow::Result<()> {
    println!("{}", format!("Snapshotting {} in {}...", disk, project).blue());

    let report = orchestrator.snapshot(project, disk, zone, name).await?;

    println!(
        "{} {} {}",
        "✓".green(),
        report.snapshot.cyan().bold(),
        format!("({} @ {})", report.disk, report.zone).dimmed()
    );
    Ok(())
}

pub async fn handle_list(orchestrator: &SnapshotOrchestrator, project: &str) -> anyhow::Result<()> {
    let snapshots = orchestrator.list(project).await?;

    if snapshots.is_empty() {
        println!("{}", format!("No snapshots in {}", project).dimmed());
        return Ok(());
    }

    println!("{}", format!("{:<40} {:<30} {:<12}", "SNAPSHOT", "DISK", "STATUS").bold());
    println!("{}", "─".repeat(82).dimmed());
    for snapshot in snapshots {
        println!(
            "{:<40} {:<30} {:<12}",
            snapshot.name.cyan(),
            snapshot.disk,
            snapshot.status
        );
    }
    Ok(())
}
