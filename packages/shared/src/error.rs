//! Error definitions for framing and connection I/O.

use std::io;

use thiserror::Error;

use crate::connection::ConnectionState;

/// Errors raised while splitting a byte stream into lines
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// A line (or the unterminated tail of the buffer) exceeded the cap
    #[error("Line exceeds {max} bytes (got {actual})")]
    LineTooLong { max: usize, actual: usize },
}

/// Errors raised by a connection while reading or writing
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The peer shut the stream down (zero-length read)
    #[error("Peer closed the connection")]
    PeerClosed,

    /// The connection is not in a state that allows the operation
    #[error("Connection is not open (state: {state:?})")]
    NotOpen { state: ConnectionState },

    /// A send could not complete immediately; unsent bytes are never queued
    #[error("Send would block")]
    WouldBlock,

    /// The socket accepted zero bytes of a non-empty write
    #[error("Socket accepted zero bytes")]
    WriteZero,

    /// The peer violated the framing rules
    #[error("Protocol violation: {0}")]
    Frame(#[from] FrameError),

    /// Any other socket failure
    #[error("Socket error: {0}")]
    Io(#[from] io::Error),
}

impl ConnectionError {
    /// Whether this error is an orderly shutdown rather than a failure.
    pub fn is_orderly(&self) -> bool {
        matches!(self, Self::PeerClosed)
    }
}
