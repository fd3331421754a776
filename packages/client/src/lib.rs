//! linechat terminal client library.
//!
//! Connects to a linechat server over a non-blocking socket, introduces
//! itself with `NICK:`, answers heartbeats and renders the chat transcript.

pub mod config;
pub mod connector;
pub mod display;
pub mod error;
pub mod input;
pub mod runner;
pub mod session;

// Re-export entry points
pub use config::ClientConfig;
pub use error::ClientError;
pub use runner::run_client;
pub use session::{ClientSession, SessionEvent};
