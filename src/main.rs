use anyhow::Result;
use jobradar::config::AppConfig;
use jobradar::start_web_server;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("jobradar=info,rocket::server=off")),
        )
        .init();

    let port = std::env::var("ROCKET_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse::<u16>()
        .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;

    let config = AppConfig::load()?;

    info!("Starting job listings scraper API");
    info!("Cache file: {}", config.cache_path.display());
    info!("Server: http://0.0.0.0:{}/api/jobs", port);

    start_web_server(config, port).await
}
