//! Line-protocol chat server.
//!
//! Relays chat lines between every connected client and announces joins,
//! renames and departures.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin linechat-server -- --port 6667
//! ```

use std::net::IpAddr;

use clap::Parser;
use linechat_server::ServerConfig;
use linechat_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(version, about = "Line-protocol chat server")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = linechat_server::config::DEFAULT_PORT)]
    port: u16,

    /// Longest line (in bytes) a client may send
    #[arg(long, default_value_t = linechat_shared::DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,

    /// Maximum number of simultaneous connections
    #[arg(long, default_value_t = linechat_server::infrastructure::DEFAULT_CAPACITY)]
    max_connections: usize,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_line_length: args.max_line_length,
            max_connections: args.max_connections,
            ..Self::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = linechat_server::run_server(args.into()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
