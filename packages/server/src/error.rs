//! Process-level server errors.

use std::{io, net::SocketAddr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Creating or polling the reactor failed
    #[error("Reactor failure: {0}")]
    Reactor(#[from] io::Error),

    /// The reactor task panicked or was cancelled
    #[error("Reactor task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
