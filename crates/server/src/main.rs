//! Film reconciliation server binary
//!
//! Serves the OpenRefine reconciliation protocol against TMDB.

use std::sync::Arc;

use server::{ServerConfig, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    server::server::init_tracing(&config.log_level)?;

    if config.tmdb_api_key.is_none() && config.tmdb_bearer_token.is_none() {
        tracing::error!("no TMDB credentials: set TMDB_API_KEY or FILMRECON_SERVER__TMDB_API_KEY");
    }
    let state = ServerState::new(config.clone())?;

    server::server::serve(config, Arc::new(state)).await
}
