mod cmd;
mod output;
mod root;
mod tools;

use clap::{Parser, Subcommand};
use cmd::{draft::DraftSubcommand, item::ItemSubcommand, spec::SpecSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "specman",
    about = "Spec management: typed requirements, plans, decisions, and milestones as YAML",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .specs/ or .git/)
    #[arg(long, global = true, env = "SPECMAN_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the .specs/ store in the current project
    Init,

    /// Create, list, inspect, update, and delete specs
    Spec {
        #[command(subcommand)]
        subcommand: SpecSubcommand,
    },

    /// Work with sub-items: add, supersede, complete tasks
    Item {
        #[command(subcommand)]
        subcommand: ItemSubcommand,
    },

    /// Check every spec and all cross-references
    Validate,

    /// Guided question-by-question spec authoring
    Draft {
        #[command(subcommand)]
        subcommand: DraftSubcommand,
    },

    /// Run as an MCP stdio server
    Mcp,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Mcp => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Spec { subcommand } => cmd::spec::run(&root, subcommand, cli.json),
        Commands::Item { subcommand } => cmd::item::run(&root, subcommand, cli.json),
        Commands::Validate => cmd::validate::run(&root, cli.json),
        Commands::Draft { subcommand } => cmd::draft::run(&root, subcommand, cli.json),
        Commands::Mcp => cmd::mcp::run(&root),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
