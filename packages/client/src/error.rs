//! Client error definitions.

use std::io;

use linechat_shared::ConnectionError;
use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Host name lookup failed or returned nothing
    #[error("Unable to resolve {target}: {source}")]
    Resolve {
        target: String,
        #[source]
        source: io::Error,
    },

    /// No resolved address accepted a connect attempt
    #[error("Connecting to {target} failed for all addresses")]
    ConnectFailed { target: String },

    #[error("Already connected")]
    AlreadyConnected,

    #[error("Not connected")]
    NotConnected,

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The reactor task panicked or was cancelled
    #[error("Reactor task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Terminal input failed: {0}")]
    Readline(#[from] ReadlineError),
}
