//! trailguide proxy entry point.
//!
//! Boots the HTTP proxy that forwards park-data requests to the NPS API
//! while keeping the API key server-side. Logging goes to stderr as JSON.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use trailguide_core::AppConfig;

mod error;
mod nps;
mod routes;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let app = routes::router(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.proxy_addr).await?;
    tracing::info!(addr = %config.proxy_addr, "starting trailguide proxy");

    axum::serve(listener, app).await?;

    Ok(())
}
