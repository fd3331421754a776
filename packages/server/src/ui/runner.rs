//! Server entry point.

use crate::{config::ServerConfig, error::ServerError};

use super::{session::ServerSession, signal::shutdown_signal};

/// Run a server until Ctrl+C or SIGTERM.
///
/// The reactor loop owns every socket and runs on a blocking task; the
/// async side only waits for a signal and then wakes the loop.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let mut session = ServerSession::bind(config)?;
    let shutdown = session.shutdown_handle();
    let mut reactor_task = tokio::task::spawn_blocking(move || session.run());

    tokio::select! {
        result = &mut reactor_task => return result?,
        () = shutdown_signal() => tracing::info!("Shutdown signal received"),
    }

    shutdown.trigger()?;
    reactor_task.await?
}
