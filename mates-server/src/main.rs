use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mates_server::config::ServerConfig;
use mates_server::store::SledUserStore;
use mates_server::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log)),
        )
        .init();

    let store = SledUserStore::open(&config.data_dir)?;
    let state = AppState::new(Arc::new(store));
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
