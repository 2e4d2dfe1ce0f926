//! Terminal prompts: the confirmation gate and the candidate picker.
//!
//! Both block on a synchronous stdin read, always before any provider call
//! is dispatched.

use colored::Colorize;
use fleetops_core::{BatchGate, BatchPlan, Candidate, PowerAction, ResolvedLocation, choose};
use std::io::Write;

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);
    line.trim().to_string()
}

pub fn confirm(question: &str) -> bool {
    let answer = read_line(&format!("{} [y/N]: ", question));
    matches!(answer.as_str(), "y" | "Y" | "yes")
}

/// Gate that renders the batch and asks for an explicit yes.
pub struct TerminalGate;

impl BatchGate for TerminalGate {
    fn confirm(&self, plan: &BatchPlan) -> bool {
        println!(
            "{}",
            format!("About to {} {} instance(s) in {}:", plan.action, plan.targets.len(), plan.project)
                .bold()
        );
        for target in &plan.targets {
            match (plan.action, &target.external_ip) {
                (PowerAction::Stop, Some(ip)) => {
                    println!("  {} ({}, {})", target.name.cyan(), target.zone, ip);
                }
                _ => println!("  {} ({})", target.name.cyan(), target.zone),
            }
        }
        for name in &plan.skipped {
            println!("  {} {}", name.yellow(), "(zone not found, will be skipped)".dimmed());
        }
        confirm("Proceed?")
    }
}

/// Render a numbered candidate list and resolve the operator's pick.
pub fn pick_candidate(candidates: &[Candidate]) -> anyhow::Result<ResolvedLocation> {
    println!("{}", "Multiple matches:".bold());
    for (i, candidate) in candidates.iter().enumerate() {
        println!(
            "  {:>2}. {:<30} {:<14} {:<12} {:<10} {}",
            i + 1,
            candidate.instance.cyan(),
            candidate.project,
            candidate.zone,
            candidate.status.to_string(),
            candidate.external_ip.as_deref().unwrap_or("-").dimmed(),
        );
    }

    let answer = read_line("Select instance: ");
    let selection: usize = answer.parse().unwrap_or(0);
    Ok(choose(candidates, selection)?)
}
