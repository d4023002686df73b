//! xlsxquiz HTTP server
//!
//! Loads configuration from the environment (and `.env` if present), then serves
//! `POST /convert` until interrupted.

use tracing_subscriber::EnvFilter;
use xlsxquiz::server::{self, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;
    server::serve(config).await?;

    Ok(())
}
