use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cards::CardCatalog;
use crate::config::LobbyConfig;

use super::gateway::Gateway;
use super::routes::EldritchServer;

const LOG_TARGET: &str = "server::bootstrap";

pub struct ServerConfig {
    pub bind: SocketAddr,
    pub catalog: CardCatalog,
    pub lobby: LobbyConfig,
    /// Seeds room codes and decks; entropy when absent.
    pub rng_seed: Option<u64>,
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    serve(listener, config, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, config: ServerConfig, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let card_count = config.catalog.len();
    let gateway = Arc::new(Gateway::new(
        Arc::new(config.catalog),
        config.lobby.clone(),
        config.rng_seed,
    ));
    let cancel = CancellationToken::new();
    let sweeper = gateway.spawn_sweeper(cancel.clone());

    let router = EldritchServer::new(Arc::clone(&gateway)).into_router();
    let local_addr = listener.local_addr()?;
    info!(
        target: LOG_TARGET,
        %local_addr,
        cards = card_count,
        idle_timeout_secs = config.lobby.max_idle.as_secs(),
        seeded = config.rng_seed.is_some(),
        "eldritch server listening"
    );

    let result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("server exited with error");

    cancel.cancel();
    if let Err(err) = sweeper.await {
        warn!(target: LOG_TARGET, error = %err, "room sweeper did not shut down cleanly");
    }
    result
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(target: LOG_TARGET, error = %err, "failed to install ctrl-c handler");
    }
    info!(target: LOG_TARGET, "shutdown signal received");
}
