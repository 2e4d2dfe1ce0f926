use super::resolve_target;
use colored::Colorize;
use fleetops_core::Resolver;

pub async fn handle(resolver: &Resolver, name: &str, instance: Option<&str>) -> anyhow::Result<()> {
    let location = resolve_target(resolver, name, instance).await?;
    let record = resolver.record(&location.project, &location.instance).await?;

    println!(
        "{} external={} internal={}",
        location.instance.cyan(),
        record.external_ip.as_deref().unwrap_or("-"),
        record.internal_ip
    );

    Ok(())
}
