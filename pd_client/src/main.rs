//! Terminal client for the prisoner's dilemma match server.

use anyhow::Result;
use pico_args::Arguments;

use pd_client::websocket_client::WebSocketClient;

const HELP: &str = "\
Play an iterated prisoner's dilemma match

USAGE:
  pd_client [OPTIONS]

OPTIONS:
  --server URL          WebSocket URL  [default: ws://localhost:3001/ws]

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server_url: pargs
            .opt_value_from_str("--server")?
            .unwrap_or_else(|| "ws://localhost:3001/ws".to_string()),
    };

    WebSocketClient::new(args.server_url).connect_and_play().await
}
