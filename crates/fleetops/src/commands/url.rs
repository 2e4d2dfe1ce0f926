use super::resolve_target;
use colored::Colorize;
use fleetops_core::Resolver;

pub async fn handle(resolver: &Resolver, name: &str, instance: Option<&str>) -> anyhow::Result<()> {
    let location = resolve_target(resolver, name, instance).await?;

    let url = format!(
        "https://console.cloud.google.com/compute/instancesDetail/zones/{}/instances/{}?project={}",
        location.zone, location.instance, location.project
    );

    println!("{}", url.cyan());
    open::that(&url)?;
    Ok(())
}
