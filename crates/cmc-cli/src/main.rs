/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod persistence;

use commands::lookup::{LookupArgs, TopArgs};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "cmc")]
#[command(propagate_version = true)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,

  /// Verbose output
  #[arg(short, long, global = true)]
  verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Resolve symbols and collect quotes until interrupted (default)
  Run,
  /// Look up every asset listed under a symbol
  Lookup(LookupArgs),
  /// List the top assets by market-cap rank
  Top(TopArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
  // Load environment variables
  dotenv().ok();

  // Parse CLI arguments
  let cli = Cli::parse();

  // Initialize logging; RUST_LOG wins over --verbose
  let log_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
  tracing_subscriber::fmt().with_env_filter(filter).init();

  // Load configuration
  let config = config::Config::from_env()?;

  // Execute command
  match cli.command.unwrap_or(Commands::Run) {
    Commands::Run => commands::run::execute(config).await?,
    Commands::Lookup(args) => commands::lookup::execute_lookup(args, config).await?,
    Commands::Top(args) => commands::lookup::execute_top(args, config).await?,
  }

  Ok(())
}
