use colored::Colorize;
use fleetops_core::Resolver;

pub async fn handle(resolver: &Resolver, project: &str, role: &str) -> anyhow::Result<()> {
    let hosts = resolver.find_by_role(project, role).await?;

    if hosts.is_empty() {
        println!("{}", format!("No '{}' hosts in {}", role, project).dimmed());
        return Ok(());
    }

    for host in hosts {
        println!("{}", host.cyan());
    }
    Ok(())
}
