use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tvlogo_sync::{
    config::Config,
    repositories::JsonChannelStore,
    services::{LogoPassCoordinator, PassSummary},
    sources::GithubTreeSource,
};

#[derive(Parser)]
#[command(name = "tvlogo-sync")]
#[command(version)]
#[command(about = "Fill in missing channel logos from the tvlogos repository")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Logos directory (overrides config and DISPATCHARR_LOGO_DIR)
    #[arg(short, long, value_name = "DIR")]
    logos_dir: Option<PathBuf>,

    /// JSON channel store (overrides config)
    #[arg(long, value_name = "FILE")]
    channels: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Run one resolution pass now
    Run,
    /// Schedule the delayed startup pass and wait for it
    Auto {
        /// Override the configured autorun delay (e.g. "12s")
        #[arg(long, value_parser = humantime::parse_duration)]
        delay: Option<std::time::Duration>,
    },
    /// Build or load the logo index and report its size
    Index,
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("tvlogo_sync={level}").into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn open_store(config: &Config) -> Option<Arc<JsonChannelStore>> {
    let path = config.storage.channels_file.as_ref()?;
    match JsonChannelStore::open(path).await {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            warn!("Channel store unavailable: {}", e);
            None
        }
    }
}

fn print_summary(summary: &PassSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    info!("Starting tvlogo-sync v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(Some(cli.config.as_path())).context("loading configuration")?;
    if let Some(dir) = cli.logos_dir {
        config.storage.logos_dir = dir;
    }
    if let Some(channels) = cli.channels {
        config.storage.channels_file = Some(channels);
    }
    info!("Logos directory: {}", config.storage.logos_dir.display());

    let source = Arc::new(GithubTreeSource::new(&config.remote)?);
    let mut coordinator = LogoPassCoordinator::new(&config, source);
    if let Some(store) = open_store(&config).await {
        coordinator = coordinator.with_store(store);
    }
    let coordinator = Arc::new(coordinator);

    match cli.command {
        Command::Run => {
            let summary = coordinator.run_now().await;
            print_summary(&summary)?;
        }
        Command::Auto { delay } => {
            if !config.autorun.enabled {
                warn!("Autorun disabled in configuration");
                return Ok(());
            }
            let delay = delay.unwrap_or(config.autorun.delay);
            if let Some(handle) = coordinator.autorun(delay) {
                let summary = handle.await.context("autorun task failed")?;
                print_summary(&summary)?;
            }
        }
        Command::Index => {
            let index = coordinator.load_index().await;
            println!(
                "{} entries ({})",
                index.len(),
                index.origin()
            );
        }
    }

    Ok(())
}
