use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use eldritch_tcg::cards::CardCatalog;
use eldritch_tcg::config::{
    LobbyConfig, DEFAULT_CODE_ATTEMPTS, DEFAULT_ENDED_ROOM_GRACE, DEFAULT_MAX_IDLE,
    DEFAULT_SWEEP_INTERVAL,
};
use eldritch_tcg::server::{run_server, ServerConfig};

const LOG_TARGET: &str = "bin::eldritch_server";
const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Parser)]
#[command(name = "eldritch_server")]
#[command(about = "Run the Eldritch TCG websocket game server", long_about = None)]
struct Args {
    /// Address to bind the HTTP/websocket server to (host:port)
    #[arg(long, env = "SERVER_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// JSON card catalog; the built-in five card set is used when omitted
    #[arg(long, env = "CARDS_PATH")]
    cards: Option<PathBuf>,

    /// Optional RNG seed for reproducible room codes and decks
    #[arg(long, env = "SERVER_RNG_SEED")]
    rng_seed: Option<u64>,

    /// Toggle structured (JSON) logs
    #[arg(long, env = "SERVER_LOG_JSON", default_value_t = false)]
    json: bool,

    /// Seconds a room may sit idle before the sweeper drops it
    #[arg(long, env = "SERVER_IDLE_TIMEOUT_SECS", default_value_t = DEFAULT_MAX_IDLE.as_secs())]
    idle_timeout_secs: u64,

    /// Seconds between idle room sweeps
    #[arg(
        long,
        env = "SERVER_SWEEP_INTERVAL_SECS",
        default_value_t = DEFAULT_SWEEP_INTERVAL.as_secs()
    )]
    sweep_interval_secs: u64,

    /// Seconds a finished room lingers before removal
    #[arg(
        long,
        env = "SERVER_ENDED_ROOM_GRACE_SECS",
        default_value_t = DEFAULT_ENDED_ROOM_GRACE.as_secs()
    )]
    ended_room_grace_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let args = Args::parse();
    init_tracing(args.json)?;
    let config = build_config(args).context("failed to build server config")?;
    run_server(config).await
}

fn load_dotenv() {
    let manifest_env_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".env");
    dotenv::from_filename(manifest_env_path).ok();
    dotenv::dotenv().ok();
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::fmt().with_env_filter(filter).with_target(true);

    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.compact().init();
    }

    Ok(())
}

fn build_config(args: Args) -> Result<ServerConfig> {
    let catalog = match &args.cards {
        Some(path) => CardCatalog::from_path(path)?,
        None => CardCatalog::builtin(),
    };
    info!(
        target: LOG_TARGET,
        source = args
            .cards
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "builtin".to_owned()),
        cards = catalog.len(),
        "card catalog loaded"
    );

    if args.sweep_interval_secs == 0 {
        anyhow::bail!("sweep interval must be at least one second");
    }

    Ok(ServerConfig {
        bind: args.bind,
        catalog,
        lobby: LobbyConfig {
            max_idle: Duration::from_secs(args.idle_timeout_secs),
            sweep_interval: Duration::from_secs(args.sweep_interval_secs),
            ended_room_grace: Duration::from_secs(args.ended_room_grace_secs),
            code_attempts: DEFAULT_CODE_ATTEMPTS,
        },
        rng_seed: args.rng_seed,
    })
}
