//! Instance rightsizing CLI
//!
//! Sizes instances from an inventory report, looks up prices, lists
//! cheaper same-size alternatives and estimates savings.

mod commands;
mod config;
mod output;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use commands::{pricing, recommend, Context};
use rightsize_lib::{RecommenderConfig, ScaleDownRecommender, Service, StaticPriceTable};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_REGION: &str = "ap-northeast-1";

/// Instance rightsizing CLI
#[derive(Parser)]
#[command(name = "rightsize")]
#[command(author, version, about = "Scale-down recommendations for cloud instances", long_about = None)]
pub struct Cli {
    /// Region to price in (defaults to the config file, then ap-northeast-1)
    #[arg(long, short, global = true, env = "RIGHTSIZE_REGION")]
    pub region: Option<String>,

    /// Service for single-type commands
    #[arg(long, short, global = true, default_value = "ec2")]
    pub service: Service,

    /// JSON price overrides: {"<service>": {"<type>": hourly_usd}}
    #[arg(long, global = true, env = "RIGHTSIZE_PRICES")]
    pub prices: Option<PathBuf>,

    /// Config file (defaults to ~/.config/rightsize/config.json)
    #[arg(long, global = true, env = "RIGHTSIZE_CLI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true)]
    pub format: Option<output::OutputFormat>,

    /// Lower bound of the target utilization band, in percent
    #[arg(long, global = true)]
    pub low: Option<f64>,

    /// Upper bound of the target utilization band, in percent
    #[arg(long, global = true)]
    pub high: Option<f64>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend smaller instance types for an inventory report
    Recommend {
        /// Inventory file: tab-separated report or JSON array of items
        #[arg(long, short)]
        input: PathBuf,

        /// Only show instances with a recommendation
        #[arg(long)]
        only_actionable: bool,
    },

    /// Show the hourly and monthly price of an instance type
    Price {
        instance_type: String,
    },

    /// List same-size alternatives in other families, cheapest first
    Alternatives {
        instance_type: String,
    },

    /// Estimate savings of switching instance types
    Savings {
        current_type: String,
        proposed_type: String,

        /// Number of instances
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
}

fn build_context(cli: &Cli) -> Result<Context> {
    let file = config::Config::load(cli.config.as_deref())?;

    let defaults = RecommenderConfig::default();
    let band = defaults.with_band(
        cli.low.or(file.target_low).unwrap_or(defaults.target_low),
        cli.high.or(file.target_high).unwrap_or(defaults.target_high),
    );
    let recommender = ScaleDownRecommender::new(band).context("Invalid target band")?;

    let mut prices = StaticPriceTable::builtin();
    if let Some(path) = cli.prices.as_ref().or(file.price_file.as_ref()) {
        let overrides = StaticPriceTable::load_file(path)?;
        debug!(path = %path.display(), entries = overrides.len(), "Loaded price overrides");
        prices.merge(overrides);
    }

    let format = match (cli.format, file.default_format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(name)) => name
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid default_format in config file: {}", e))?,
        (None, None) => output::OutputFormat::Table,
    };

    Ok(Context {
        region: cli
            .region
            .clone()
            .or(file.region)
            .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        service: cli.service,
        prices,
        recommender,
        format,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let ctx = build_context(&cli)?;

    match cli.command {
        Commands::Recommend {
            input,
            only_actionable,
        } => {
            recommend::run(&ctx, &input, only_actionable).await?;
        }
        Commands::Price { instance_type } => {
            pricing::show_price(&ctx, &instance_type).await?;
        }
        Commands::Alternatives { instance_type } => {
            pricing::show_alternatives(&ctx, &instance_type).await?;
        }
        Commands::Savings {
            current_type,
            proposed_type,
            count,
        } => {
            pricing::show_savings(&ctx, &current_type, &proposed_type, count).await?;
        }
    }

    Ok(())
}
