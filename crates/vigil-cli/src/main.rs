mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Vigil -- cloud account monitoring fan-in pipeline.
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one or more inbound events through the pipeline
    Dispatch {
        /// Path to the vigil.toml configuration
        #[arg(long)]
        config: PathBuf,

        /// Path to a JSON file with one event, or `-` for stdin
        event: PathBuf,

        /// Treat the input as a JSON array of events
        #[arg(long)]
        batch: bool,
    },

    /// Process an organization-trail log delivery
    Trail {
        /// Path to the vigil.toml configuration
        #[arg(long)]
        config: PathBuf,

        /// Path to the base64+gzip subscription payload, or `-` for stdin
        payload: PathBuf,
    },

    /// Classify an event without dispatching anything
    Classify {
        /// Path to a JSON file with one event, or `-` for stdin
        event: PathBuf,
    },

    /// Configuration subcommands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show recent dispatch history
    History {
        /// Path to the vigil.toml configuration
        #[arg(long)]
        config: PathBuf,

        /// Maximum number of entries to show
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Send a connectivity-check message to every configured endpoint
    SinkTest {
        /// Path to the vigil.toml configuration
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Load and validate a configuration file
    Validate {
        /// Path to the vigil.toml configuration
        #[arg(long)]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing with env filter (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dispatch {
            config,
            event,
            batch,
        } => commands::dispatch::run(&config, &event, batch),
        Commands::Trail { config, payload } => commands::trail::run(&config, &payload),
        Commands::Classify { event } => commands::classify::run(&event),
        Commands::Config { action } => match action {
            ConfigCommands::Validate { path } => commands::config::validate(&path),
        },
        Commands::History { config, limit } => commands::history::run(&config, limit),
        Commands::SinkTest { config } => commands::sink_test::run(&config),
    }
}
