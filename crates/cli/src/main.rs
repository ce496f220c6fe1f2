//! Tamarind CLI - Catalog seeding and a scripted storefront session.
//!
//! # Usage
//!
//! ```bash
//! # Print a seeded sample catalog as JSON
//! tamarind seed --count 5
//!
//! # Run the scripted demo session (browse, cart, checkout)
//! tamarind demo
//! ```
//!
//! Everything runs against the in-memory store; no credentials or network
//! access are needed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "tamarind")]
#[command(author, version, about = "Tamarind CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a seeded sample catalog as JSON
    Seed {
        /// Number of products to seed
        #[arg(short, long, default_value_t = 5)]
        count: usize,
    },
    /// Run a scripted storefront session against the in-memory store
    Demo,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::from_env()?;

    match cli.command {
        Commands::Seed { count } => commands::seed::print_catalog(count).await?,
        Commands::Demo => commands::demo::run(&config).await?,
    }
    Ok(())
}
