use crate::prompt::TerminalGate;
use colored::Colorize;
use fleetops_core::{BatchResult, InstanceOutcome, LifecycleController, Outcome};

pub async fn handle_start(
    controller: &LifecycleController,
    project: &str,
    names: &[String],
    yes: bool,
) -> anyhow::Result<()> {
    if names.is_empty() {
        anyhow::bail!("no instance names given");
    }

    println!("{}", format!("Starting {} instance(s) in {}...", names.len(), project).blue());
    let result = controller.start_many(project, names, yes, &TerminalGate).await?;
    render(result, true);
    Ok(())
}

pub async fn handle_stop(
    controller: &LifecycleController,
    project: &str,
    names: &[String],
    yes: bool,
) -> anyhow::Result<()> {
    if names.is_empty() {
        anyhow::bail!("no instance names given");
    }

    println!("{}", format!("Stopping {} instance(s) in {}...", names.len(), project).yellow());
    let result = controller.stop_many(project, names, yes, &TerminalGate).await?;
    render(result, false);
    Ok(())
}

/// One line per instance; partial failures are reported, never fatal once
/// the dispatch phase completed.
fn render(result: BatchResult, show_ip: bool) {
    let outcomes = match result {
        BatchResult::Cancelled => {
            println!("{}", "Cancelled.".yellow());
            return;
        }
        BatchResult::Completed(outcomes) => outcomes,
    };

    println!();
    for outcome in &outcomes {
        render_line(outcome, show_ip);
    }
}

fn render_line(outcome: &InstanceOutcome, show_ip: bool) {
    match &outcome.outcome {
        Outcome::Dispatched => {
            let ip = match (show_ip, &outcome.external_ip) {
                (true, Some(ip)) => format!("  {}", ip),
                (true, None) => "  (no external IP yet)".to_string(),
                (false, _) => String::new(),
            };
            println!("{} {}{}", "✓".green(), outcome.name.cyan(), ip.dimmed());
        }
        Outcome::ZoneNotFound => {
            println!("{} {} {}", "✗".red(), outcome.name, "zone not found".red());
        }
        Outcome::ProviderError(message) => {
            println!("{} {} {}", "✗".red(), outcome.name, message.red());
        }
    }
}
