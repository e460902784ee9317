//! Review Sentinel CLI
//!
//! Command-line interface for the homework review status poller.

use std::path::PathBuf;

use clap::Parser;
use review_sentinel::{load_config, load_dotenv, Config, Credentials};
use tracing::Level;

#[derive(Parser)]
#[command(name = "review-sentinel")]
#[command(about = "Homework review status poller with Telegram notifications")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Polling interval in seconds (overrides config file)
    #[arg(long)]
    interval: Option<u64>,

    /// Env file with credentials; variables already set take precedence
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, interval={:?}, log_level={:?}",
        args.config,
        args.interval,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(interval) = args.interval {
        config.polling.interval_seconds = interval;
    }

    load_dotenv(&args.env_file)?;

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    };

    tracing::info!("Starting review sentinel");
    tracing::debug!(
        "Endpoint: {}, interval: {}s, request timeout: {}s",
        config.practicum.endpoint,
        config.polling.interval_seconds,
        config.polling.request_timeout_seconds
    );

    review_sentinel::run(config, credentials).await?;

    Ok(())
}
