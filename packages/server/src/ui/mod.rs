//! Line-protocol chat server: the reactor-facing layer.

mod handler;
mod runner;
mod session;
mod signal;

pub use runner::run_server;
pub use session::{LISTENER_ID, ServerSession};
