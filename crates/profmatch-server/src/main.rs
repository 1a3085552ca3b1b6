//! profmatch Server Binary
//!
//! Reads `PROFMATCH_CONFIG` (TOML file) and `PROFMATCH_ADDR` (bind address
//! override); log filtering follows `RUST_LOG`.

use std::sync::Arc;

use profmatch_core::MatchConfig;
use profmatch_server::{serve, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = match std::env::var("PROFMATCH_CONFIG") {
        Ok(path) => MatchConfig::load(&path)?,
        Err(_) => MatchConfig::default(),
    };
    if let Ok(addr) = std::env::var("PROFMATCH_ADDR") {
        config.server.addr = addr;
    }

    let addr = config.server.addr.clone();
    let state = Arc::new(AppState::open(config)?);

    serve(&addr, state).await
}
