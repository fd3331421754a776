//! Domain layer error definitions.

use linechat_shared::SocketId;
use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Nickname validation error
    #[error("Nickname cannot be empty")]
    NicknameEmpty,

    /// Nickname too long error
    #[error("Nickname cannot exceed {max} characters (got {actual})")]
    NicknameTooLong { max: usize, actual: usize },

    /// Nickname contains a character that would break the wire format
    #[error("Nickname cannot contain {0:?}")]
    NicknameInvalidCharacter(char),

    /// MessageText validation error
    #[error("Message text cannot be empty")]
    MessageTextEmpty,
}

/// Errors related to the connection registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Registry capacity exceeded error
    #[error("Registry capacity exceeded: maximum {capacity} connections allowed (current: {current})")]
    CapacityExceeded { capacity: usize, current: usize },

    /// The socket is already registered
    #[error("Socket {0} is already registered")]
    DuplicateSocket(SocketId),

    /// No entry for the socket
    #[error("Socket {0} is not registered")]
    UnknownSocket(SocketId),
}
