//! Line protocol engine shared by the linechat server and client.
//!
//! This crate turns raw non-blocking sockets into typed chat commands:
//! a readiness reactor tells the owner which sockets can make progress,
//! a [`Connection`] drains bytes through the frame assembler, and the
//! command codec classifies each logical line.

pub mod connection;
pub mod error;
pub mod logger;
pub mod protocol;
pub mod reactor;
pub mod time;

pub use connection::{Connection, ConnectionState, Drained, SocketId};
pub use error::{ConnectionError, FrameError};
pub use protocol::{Command, DEFAULT_MAX_LINE_LENGTH, DEFAULT_NICKNAME, FrameAssembler};
pub use reactor::{Interests, MioReactor, Notification, Readiness, ReadinessSource, ShutdownHandle};
