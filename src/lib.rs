//! # Subnetter
//!
//! Command-line interface for application subnet allocation.
//! This crate provides the CLI structure, argument parsing, configuration and
//! command routing on top of `subnetter-core` and `subnetter-api`.

pub mod commands;
pub mod config;
pub mod display;

// Re-export common types
pub use config::Config;

use clap::{Args, Parser, Subcommand};
use subnetter_core::AddressBlock;
use thiserror::Error;

/// Application-level errors for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Core domain error: {0}")]
    Core(#[from] subnetter_core::CoreError),

    #[error("Allocation error: {0}")]
    Allocation(#[from] subnetter_core::AllocationError),

    #[error("API error: {0}")]
    Api(#[from] subnetter_api::ApiError),

    #[error("Utils error: {0}")]
    Utils(#[from] subnetter_utils::UtilsError),

    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Main CLI struct
#[derive(Parser)]
#[command(name = "subnetter")]
#[command(about = "Allocate application subnets and inspect stack status")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command. Flags beat environment, which beats the config file.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// AWS region to query
    #[arg(long, global = true, env = "SUBNETTER_REGION")]
    pub region: Option<String>,

    /// Base /16 network application blocks are carved from
    #[arg(long, global = true, env = "SUBNETTER_BASE_NETWORK")]
    pub base_network: Option<String>,

    /// Cluster name
    #[arg(long, global = true, env = "SUBNETTER_CLUSTER")]
    pub cluster: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the next free application subnet
    Next,
    /// Divide an application subnet into /27 placement ranges
    Divide {
        /// Application block, e.g. 10.0.5.0/24
        #[arg(value_parser = parse_block)]
        block: AddressBlock,
        /// Number of ranges (at most 4)
        #[arg(short, long, default_value_t = 4, value_parser = parse_count)]
        count: usize,
    },
    /// Translate CloudFormation stack statuses to canonical states
    Status {
        /// Provider statuses, e.g. CREATE_COMPLETE
        #[arg(required = true)]
        statuses: Vec<String>,
    },
    /// List application stacks with their subnet and status
    Apps,
    /// Show a stack's outputs
    Outputs {
        /// Stack name
        stack: String,
        /// Only outputs whose key starts with this prefix
        #[arg(short, long)]
        prefix: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Get configuration value
    Get {
        /// Configuration key, e.g. aws.region
        key: String,
    },
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
    /// Remove configuration value
    Unset {
        /// Configuration key
        key: String,
    },
}

fn parse_block(input: &str) -> std::result::Result<AddressBlock, String> {
    subnetter_utils::parse_address_block(input).map_err(|e| e.to_string())
}

fn parse_count(input: &str) -> std::result::Result<usize, String> {
    subnetter_utils::parse_division_count(input).map_err(|e| e.to_string())
}

/// Main CLI runner - flags and environment are layered over the config file
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::new()?;
    let json = cli.global.json;

    match cli.command {
        Commands::Next => {
            let config = config.with_overrides(&cli.global)?;
            commands::next::handle(&config, json).await
        }
        Commands::Divide { block, count } => commands::divide::handle(&block, count, json),
        Commands::Status { statuses } => commands::status::handle(&statuses, json),
        Commands::Apps => {
            let config = config.with_overrides(&cli.global)?;
            commands::apps::handle(&config, json).await
        }
        Commands::Outputs { stack, prefix } => {
            let config = config.with_overrides(&cli.global)?;
            commands::outputs::handle(&config, &stack, prefix.as_deref(), json).await
        }
        Commands::Config { action } => commands::config::handle(action, config, json),
    }
}
