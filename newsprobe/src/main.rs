/*
newsprobe - single-binary main.rs
This binary builds the news analyzer (probing all four models eagerly) and
starts the Rocket HTTP server in the same process.
*/

use anyhow::Result;
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use newsprobe::analyzer::NewsAnalyzer;
use newsprobe::server::launch_rocket;

#[derive(Parser, Debug)]
#[command(name = "newsprobe", about = "Newsprobe multi-model news analysis server")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Resolve config paths
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    // Load configuration with defaults
    let config = match Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    info!(default = ?default_path, overrides = ?override_path, "configuration loaded");

    // Resolve the inference API key from the configured env var. Public
    // models accept anonymous requests, so a missing key is a warning, not
    // an error.
    let api_key = match config.inference.api_key_env.as_deref() {
        Some(var) => match std::env::var(var) {
            Ok(key) => Some(key),
            Err(_) => {
                warn!("inference API key env var '{}' not set; proceeding unauthenticated", var);
                None
            }
        },
        None => None,
    };

    // Construct the analyzer eagerly. All four models are probed here;
    // a bad model identifier or unreachable API aborts startup.
    info!("Connecting to inference API and probing models");
    let analyzer = match NewsAnalyzer::connect(&config, api_key).await {
        Ok(analyzer) => Arc::new(analyzer),
        Err(e) => {
            error!("failed to construct analyzer: {:#}", e);
            return Err(e);
        }
    };
    info!("All four models ready");

    // Launch the Rocket server (blocking until Rocket shuts down)
    info!("Launching Rocket HTTP server");
    if let Err(e) = launch_rocket(analyzer, Arc::new(config)).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}
