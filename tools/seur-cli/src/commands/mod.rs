//! CLI command implementations.

pub mod config;
pub mod estimate;
pub mod extract;
pub mod watch;

use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Page to read: a file path or an http(s) URL.
    pub page: String,
}

/// Arguments for the estimate command.
#[derive(Args)]
pub struct EstimateArgs {
    /// Page to read: a file path or an http(s) URL.
    pub page: String,

    /// Skip the pricing service and use the local rule.
    #[arg(long)]
    pub offline: bool,

    /// Override the free-shipping threshold.
    #[arg(long)]
    pub threshold: Option<f64>,
}

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Page to watch: a file path or an http(s) URL.
    pub page: String,

    /// Skip the pricing service and use the local rule.
    #[arg(long)]
    pub offline: bool,

    /// Polling interval in milliseconds.
    #[arg(short, long)]
    pub interval: Option<u64>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,

        /// File format to write.
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
    /// Validate the config file.
    Validate,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
}
