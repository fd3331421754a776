//! linechat server library.
//!
//! A single-threaded, reactor-driven chat server speaking the
//! newline-delimited `NICK:` / `MSG:` / `PING` protocol.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

#[cfg(test)]
mod test_support;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{ServerSession, run_server};
