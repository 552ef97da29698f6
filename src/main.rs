//! HTTP server for the rank engine.
//!
//! Environment:
//! - `RANK_ENGINE_CONFIG`: directory holding `rank.yaml` (default `./config`)
//! - `RANK_ENGINE_ADDR`: listen address (default `127.0.0.1:8080`)
//! - `RUST_LOG`: tracing filter (default `info`)

use rank_engine::api::{AppState, create_router};
use rank_engine::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config";
const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_dir =
        std::env::var("RANK_ENGINE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let addr = std::env::var("RANK_ENGINE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir)?;
    info!(
        path = %config_dir,
        mode = ?config.compute().mode,
        "Configuration loaded"
    );

    let router = create_router(AppState::new(config)?);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Rank engine listening");

    axum::serve(listener, router).await?;
    Ok(())
}
