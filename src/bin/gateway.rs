//! API Dock gateway - serves `/settings` and the proxied endpoints

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use apidock::config::Config;
use apidock::gateway::run_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = Config::default_path();
    let config = Config::load_from(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!(config = %path.display(), "Configuration loaded");

    run_server(config.gateway).await
}
