//! SEUR CLI - Shipping estimates for storefront cart pages.
//!
//! Commands:
//! - `seur extract` - Read the cart from a page
//! - `seur estimate` - Estimate shipping for the cart on a page
//! - `seur watch` - Keep an estimate current while the page changes
//! - `seur config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;
mod presenter;

use anyhow::Result;
use clap::{Parser, Subcommand};
use seur_observability::{init_logging, LogLevel};

use commands::{ConfigArgs, EstimateArgs, ExtractArgs, WatchArgs};

/// SEUR CLI - Estimate SEUR shipping for storefront carts
#[derive(Parser)]
#[command(name = "seur")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the cart from a page
    Extract(ExtractArgs),

    /// Estimate shipping for the cart on a page
    Estimate(EstimateArgs),

    /// Watch a page and keep the estimate current
    Watch(WatchArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    let mut log_config = ctx.config.logging.clone();
    if cli.verbose {
        log_config = log_config.with_level(LogLevel::Debug);
    }
    if let Err(e) = init_logging(&log_config) {
        ctx.output.warn(&format!("Logging disabled: {}", e));
    }

    let result = match cli.command {
        Commands::Extract(args) => commands::extract::run(args, &ctx).await,
        Commands::Estimate(args) => commands::estimate::run(args, &ctx).await,
        Commands::Watch(args) => commands::watch::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
