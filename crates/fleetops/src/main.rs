mod commands;
mod prompt;

use clap::{Parser, Subcommand};
use fleetops_cloud_gce::GceProvider;
use fleetops_core::{CacheStore, ConsoleConfig, InventoryFetcher, LifecycleController, Resolver,
    SnapshotOrchestrator};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "fops")]
#[command(about = "Operator console for VM fleets spread across cloud projects", version)]
struct Cli {
    /// Drop cached inventory before running, forcing live fetches
    #[arg(long, global = true)]
    refresh: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List accessible projects
    Projects,
    /// List the instance inventory of a project
    Instances {
        project: String,
    },
    /// Search every project for an instance name or fragment
    Find {
        name: String,
    },
    /// Print the IPs of an instance
    Ip {
        /// Instance name, or a project when an instance is also given
        name: String,
        /// Instance name within the project given as the first argument
        instance: Option<String>,
    },
    /// Open an interactive SSH session on an instance
    Ssh {
        /// Instance name, or a project when an instance is also given
        name: String,
        /// Instance name within the project given as the first argument
        instance: Option<String>,
    },
    /// Open the cloud console page of an instance in a browser
    Url {
        /// Instance name, or a project when an instance is also given
        name: String,
        /// Instance name within the project given as the first argument
        instance: Option<String>,
    },
    /// Open the AEM author endpoint of a host (dispatchers excluded)
    Aem {
        name: String,
    },
    /// List hosts in a project whose names carry a role token
    Role {
        project: String,
        role: String,
    },
    /// Start instances in a project
    Start {
        project: String,
        names: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Stop instances in a project
    Stop {
        project: String,
        names: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Snapshot a disk
    Snapshot {
        project: String,
        disk: String,
        /// Disk zone; resolved from a live disk listing when omitted
        #[arg(long)]
        zone: Option<String>,
        /// Snapshot name; defaults to <disk>-snap-<UTC timestamp>
        #[arg(long)]
        name: Option<String>,
    },
    /// List snapshots in a project
    Snapshots {
        project: String,
    },
    /// Manage the local inventory cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Drop every cached entry
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ConsoleConfig::load();

    let cache = CacheStore::open(&config.cache_dir, config.cache_ttl)?;
    let provider = Arc::new(GceProvider::new());
    let fetcher = InventoryFetcher::new(provider, cache);

    if cli.refresh {
        fetcher.cache().invalidate_all().await?;
    }

    let resolver = Resolver::new(fetcher.clone(), config.dispatcher_token.clone());

    match cli.command {
        Commands::Projects => {
            commands::projects::handle(&fetcher).await?;
        }
        Commands::Instances { project } => {
            commands::instances::handle(&fetcher, &project).await?;
        }
        Commands::Find { name } => {
            commands::find::handle(&resolver, &name).await?;
        }
        Commands::Ip { name, instance } => {
            commands::ip::handle(&resolver, &name, instance.as_deref()).await?;
        }
        Commands::Ssh { name, instance } => {
            commands::ssh::handle(&resolver, &name, instance.as_deref()).await?;
        }
        Commands::Url { name, instance } => {
            commands::url::handle(&resolver, &name, instance.as_deref()).await?;
        }
        Commands::Aem { name } => {
            commands::aem::handle(&resolver, &name).await?;
        }
        Commands::Role { project, role } => {
            commands::role::handle(&resolver, &project, &role).await?;
        }
        Commands::Start { project, names, yes } => {
            let controller = LifecycleController::new(fetcher.clone(), config.settle_delay);
            commands::power::handle_start(&controller, &project, &names, yes).await?;
        }
        Commands::Stop { project, names, yes } => {
            let controller = LifecycleController::new(fetcher.clone(), config.settle_delay);
            commands::power::handle_stop(&controller, &project, &names, yes).await?;
        }
        Commands::Snapshot {
            project,
            disk,
            zone,
            name,
        } => {
            let orchestrator = SnapshotOrchestrator::new(fetcher.clone());
            commands::snapshot::handle(&orchestrator, &project, &disk, zone.as_deref(), name.as_deref())
                .await?;
        }
        Commands::Snapshots { project } => {
            let orchestrator = SnapshotOrchestrator::new(fetcher.clone());
            commands::snapshot::handle_list(&orchestrator, &project).await?;
        }
        Commands::Cache(CacheCommands::Clear) => {
            commands::cache::handle_clear(&fetcher).await?;
        }
    }

    Ok(())
}
