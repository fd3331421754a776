//! Wire protocol: newline framing and the command codec.

pub mod command;
pub mod frame;

pub use command::{Command, DEFAULT_NICKNAME};
pub use frame::{DEFAULT_MAX_LINE_LENGTH, FrameAssembler, Frames};
