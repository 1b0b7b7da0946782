//! Iterated prisoner's dilemma match server.
//!
//! Spawns a single lobby actor that owns every room and serves the match
//! protocol over WebSocket.

use std::net::IpAddr;

use anyhow::Error;
use log::{info, warn};
use pd_server::{api, config::ServerConfig, logging, metrics};
use pico_args::Arguments;
use prisoners_dilemma::{LobbyActor, RoomStore};

const HELP: &str = "\
Run an iterated prisoner's dilemma match server

USAGE:
  pd_server [OPTIONS]

OPTIONS:
  --host       IP          Listen address              [default: env HOST or 0.0.0.0]
  --port       PORT        Listen port                 [default: env PORT or 3001]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  PORT                     Listen port
  HOST                     Listen address
  CLIENT_CHANNEL_CAPACITY  Outbound events buffered per connection
  LOBBY_INBOX_CAPACITY     Lobby actor inbox depth
  WS_BURST_LIMIT           Frames per second per connection
  WS_SUSTAINED_LIMIT       Frames per minute per connection
  METRICS_BIND             Prometheus exporter address (disabled when unset)
  RUST_LOG                 Log filter
";

struct Args {
    host: Option<IpAddr>,
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        host: pargs.opt_value_from_str("--host")?,
        port: pargs.opt_value_from_str("--port")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.host, args.port)?;
    config.validate()?;

    if let Some(addr) = config.metrics_bind {
        match metrics::init_metrics(addr) {
            Ok(()) => info!("Prometheus metrics exported at http://{}/metrics", addr),
            Err(e) => warn!("{}", e),
        }
    }

    let lobby = LobbyActor::spawn(RoomStore::new(), config.lobby.inbox_capacity);

    let app = api::create_router(api::AppState {
        lobby,
        websocket: config.websocket.clone(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!("Server running on port {}", config.bind.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Resolves on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
