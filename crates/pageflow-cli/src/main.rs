use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pageflow_core::AppConfig;

mod commands;
mod headless;
mod site;

#[derive(Parser)]
#[command(name = "pageflow")]
#[command(author, version, about = "Headless smooth-scroll and page transition runtime")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.config/pageflow/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted session against a site manifest
    Simulate {
        /// Site manifest (TOML)
        #[arg(short = 's', long)]
        site: PathBuf,
        /// Session script (TOML)
        #[arg(short = 'S', long)]
        script: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the pages a site manifest declares
    Pages {
        /// Site manifest (TOML)
        #[arg(short = 's', long)]
        site: PathBuf,
    },
    /// Print the effective configuration
    Config {
        /// Print built-in defaults instead
        #[arg(long)]
        default: bool,
        /// Write the configuration to the config file instead of printing it
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration; `config --write` may create the file
    let creating = matches!(cli.command, Commands::Config { write: true, .. });
    let config = match &cli.config {
        Some(path) if creating && !path.exists() => AppConfig::default(),
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Simulate { site, script, json } => {
            commands::simulate::run(&config, &site, &script, json).await
        }
        Commands::Pages { site } => commands::pages::run(&config, &site),
        Commands::Config { default, write } => {
            commands::config::run(&config, cli.config.as_deref(), default, write)
        }
    }
}
