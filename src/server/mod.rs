//! HTTP server for veloce
//!
//! Provides REST API endpoints for suggestions, resolution, current
//! location and the ride state they feed.

pub mod routes;
pub mod state;

use crate::config::Config;
use crate::error::Result;
use routes::create_router;
use state::LiveState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Start the HTTP server
///
/// # Arguments
/// * `config` - Server configuration
///
/// # Returns
/// Never returns unless the server shuts down
pub async fn run(config: Config) -> Result<()> {
    let addr = config.server_addr();
    run_on(&addr, config).await
}

/// Start the HTTP server with a specific address
///
/// Useful for tests or when you want to override config
pub async fn run_on(addr: &str, config: Config) -> Result<()> {
    let addr: SocketAddr = addr.parse().map_err(|e| {
        crate::error::Error::Server(format!("Invalid server address: {}", e))
    })?;

    let state = Arc::new(LiveState::from_config(&config)?);
    if !state.places_configured() {
        tracing::warn!("no Places API key configured; suggestions will be empty");
    }
    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        crate::error::Error::Server(format!("Failed to bind to {}: {}", addr, e))
    })?;

    axum::serve(listener, app).await?;

    Ok(())
}
