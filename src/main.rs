use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use triple_cache::{
    config::{
        defaults::{DEFAULT_LOG_LEVEL, DEFAULT_PLACEHOLDER_SIZE},
        Config,
    },
    demo::run_scenario,
    resources::load_image,
    ImageHandle,
};

#[derive(Parser)]
#[command(name = "triple-cache")]
#[command(version)]
#[command(about = "Runs the channel cache smoke test: insert, query and rename")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path (falls back to $CONFIG_FILE, then the built-in default)
    #[arg(short, long)]
    config: Option<String>,

    /// Channel name to insert (overrides config file)
    #[arg(short, long)]
    name: Option<String>,

    /// Stream URL to insert (overrides config file)
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Logo image file; a placeholder is generated when omitted
    #[arg(short, long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Log level (overrides config file)
    #[arg(short = 'v', long)]
    log_level: Option<String>,

    /// Print the scenario report as JSON
    #[arg(long)]
    json: bool,
}

/// RUST_LOG wins over the level from the command line or config file
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("triple_cache={}", level)))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter_set = EnvFilter::try_from_default_env().is_ok();
    let startup_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let (filter, filter_handle) = reload::Layer::new(log_filter(&startup_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    if let Some(name) = cli.name {
        config.demo.name = name;
    }
    if let Some(url) = cli.url {
        config.demo.url = url;
    }
    if let Some(image) = cli.image {
        config.demo.image_path = Some(image);
    }
    match cli.log_level {
        Some(level) => config.logging.level = level,
        None if !env_filter_set && config.logging.level != startup_level => {
            filter_handle
                .reload(log_filter(&config.logging.level))
                .context("Failed to apply configured log level")?;
        }
        None => {}
    }

    info!("Starting triple-cache v{}", env!("CARGO_PKG_VERSION"));

    let image = match &config.demo.image_path {
        Some(path) => load_image(path)
            .with_context(|| format!("Failed to load logo {}", path.display()))?,
        None => {
            info!("No logo configured, using generated placeholder");
            ImageHandle::placeholder(DEFAULT_PLACEHOLDER_SIZE, DEFAULT_PLACEHOLDER_SIZE)
        }
    };

    let report = run_scenario(&config.demo, &config.cache, image)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for check in &report.checks {
            println!("[{}] {}", if check.passed { "PASS" } else { "FAIL" }, check.name);
        }
    }

    if report.passed() {
        if !cli.json {
            println!("Exiting simple test driver with success");
        }
        Ok(())
    } else {
        let failed = report.failures().count();
        error!("{} of {} checks failed", failed, report.checks.len());
        anyhow::bail!("{} checks failed", failed)
    }
}
