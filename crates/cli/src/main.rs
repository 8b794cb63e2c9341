//! EV Charging Predictor CLI
//!
//! A command-line tool for requesting charging duration estimates and
//! pile fault assessments from the prediction service.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{
    health,
    predict::{self, DurationArgs, FaultArgs},
};

/// EV Charging Predictor CLI
#[derive(Parser)]
#[command(name = "evp")]
#[command(author, version, about = "CLI for the EV Charging Predictor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via EVP_API_URL env var)
    #[arg(long, env = "EVP_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate charging duration, energy and cost
    Duration(DurationArgs),

    /// Assess charging pile fault risk
    Fault(FaultArgs),

    /// Show service health and model availability
    Health,

    /// Manage CLI configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,

    /// Set the prediction service URL
    SetUrl {
        /// Service base URL, e.g. http://localhost:5000
        url: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::Config::load()?;
    let format = cli.format;

    // Only prediction and health commands talk to the service
    let connect = || {
        client::ApiClient::new(&config::resolve_api_url(cli.api_url.as_deref(), &config))
    };

    match cli.command {
        Commands::Duration(args) => {
            predict::predict_duration(&connect()?, &args, format).await?;
        }
        Commands::Fault(args) => {
            predict::predict_fault(&connect()?, &args, format).await?;
        }
        Commands::Health => {
            health::show_health(&connect()?, format).await?;
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Show => {
                commands::config::show_config(&config, cli.api_url.as_deref(), format)?;
            }
            ConfigCommands::SetUrl { url } => {
                commands::config::set_url(config.clone(), &url)?;
            }
        },
    }

    Ok(())
}
