//! Offline scrape: runs one full pass over every configured source, writes
//! the snapshot where a static front end can pick it up, and pre-warms the
//! service cache. The live API stays authoritative; this only exports the
//! same snapshot format ahead of time.

use anyhow::{Context, Result};
use clap::Parser;
use jobradar::config::AppConfig;
use jobradar::service::JobService;
use std::path::PathBuf;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

#[derive(Parser)]
#[command(name = "scrape", about = "Scrape all job sources and export the snapshot")]
struct Args {
    /// Where to write the per-source listings JSON.
    #[arg(long, default_value = "public/jobs.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("jobradar=info")))
        .init();

    let args = Args::parse();
    let config = AppConfig::load()?;
    let service = JobService::new(config);

    info!("Starting scrape pass");
    let entry = service
        .refresh()
        .await
        .map_err(|e| anyhow::anyhow!("Scrape pass failed: {}", e))?;

    for (source, listings) in &entry.collections {
        info!("[{}] {} listings", source, listings.len());
    }

    if let Some(parent) = args.output.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(&entry.collections)
        .context("Failed to serialize snapshot")?;
    tokio::fs::write(&args.output, json)
        .await
        .with_context(|| format!("Failed to write snapshot: {}", args.output.display()))?;

    info!("Snapshot written to {}", args.output.display());
    Ok(())
}
