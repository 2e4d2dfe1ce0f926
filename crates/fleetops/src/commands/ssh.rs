use super::resolve_target;
use colored::Colorize;
use fleetops_core::Resolver;

/// Hand the terminal over to `gcloud compute ssh` with the resolved triple.
pub async fn handle(resolver: &Resolver, name: &str, instance: Option<&str>) -> anyhow::Result<()> {
    let location = resolve_target(resolver, name, instance).await?;

    println!(
        "{}",
        format!(
            "Connecting to {} ({}/{})...",
            location.instance, location.project, location.zone
        )
        .blue()
    );

    let status = std::process::Command::new("gcloud")
        .args([
            "compute",
            "ssh",
            &location.instance,
            "--project",
            &location.project,
            "--zone",
            &location.zone,
        ])
        .status()?;

    if !status.success() {
        anyhow::bail!("ssh session exited with {}", status);
    }
    Ok(())
}
