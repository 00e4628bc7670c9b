//! Packgraph CLI entry point

use clap::{Parser, Subcommand};
use packgraph_indexer::ConfigOverrides;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "packgraph")]
#[command(about = "Dependency graphs for security-automation content packs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to packgraph.toml in the repository root)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the content graph of a repository
    Build {
        /// Content repository holding Packs/
        #[arg(short, long)]
        repo: Option<PathBuf>,

        /// Upstream repository with the shared library packs
        #[arg(short, long)]
        upstream: Option<PathBuf>,

        /// JSON inventory of installed packs
        #[arg(short, long)]
        inventory: Option<PathBuf>,

        /// Pack directory to leave out (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Only build this pack directory (repeatable)
        #[arg(short, long)]
        pack: Vec<String>,

        /// Print the custom graph as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Write the JSON graph to a file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export the custom graph to --output in this format (GraphML, GML)
        #[arg(long, requires = "output")]
        export_format: Option<String>,
    },
    /// Show which installed packs provide a content item
    Resolve {
        /// Script, playbook or integration command name
        name: String,

        /// JSON inventory of installed packs
        #[arg(short, long)]
        inventory: PathBuf,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "packgraph={log_level},packgraph_core={log_level},packgraph_indexer={log_level}"
        ))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Build {
            repo,
            upstream,
            inventory,
            exclude,
            pack,
            json,
            output,
            export_format,
        } => {
            tracing::info!("Packgraph v{}", env!("CARGO_PKG_VERSION"));
            let overrides = ConfigOverrides {
                repo,
                upstream,
                inventory,
                exclude,
                packs: pack,
            };
            let output = commands::BuildOutput {
                json,
                path: output,
                export_format,
            };
            commands::build(cli.config, overrides, output)
        }
        Commands::Resolve { name, inventory } => commands::resolve(&name, &inventory),
        Commands::Version => {
            println!("Packgraph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
