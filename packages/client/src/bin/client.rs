//! Terminal chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin linechat-client -- --nickname alice
//! ```

use clap::Parser;
use linechat_client::{
    ClientConfig,
    config::{DEFAULT_HOST, DEFAULT_PORT},
};
use linechat_shared::{DEFAULT_MAX_LINE_LENGTH, DEFAULT_NICKNAME, logger::setup_stderr_logger};

#[derive(Debug, Parser)]
#[command(version, about = "Line-protocol chat client")]
struct Args {
    /// Server host name or address
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Nickname announced on connect
    #[arg(short, long, default_value = DEFAULT_NICKNAME)]
    nickname: String,

    /// Longest line (in bytes) accepted from the server
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Start disconnected and wait for /connect
    #[arg(long)]
    no_connect: bool,
}

impl From<Args> for ClientConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            nickname: args.nickname,
            max_line_length: args.max_line_length,
            auto_connect: !args.no_connect,
            ..Self::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Logs go to stderr; stdout is the transcript
    setup_stderr_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = linechat_client::run_client(args.into()).await {
        tracing::error!("Client error: {}", e);
        eprintln!("{e}");
        std::process::exit(1);
    }
}
