//! Command codec: logical lines to typed commands and back.

use std::fmt;

/// Nickname used when a peer asks for a name without giving one
pub const DEFAULT_NICKNAME: &str = "Guest";

const NICK_PREFIX: &str = "NICK:";
const MSG_PREFIX: &str = "MSG:";
const FROM_PREFIX: &str = "FROM:";
const INFO_PREFIX: &str = "INFO:";
const PING: &str = "PING";
const PONG: &str = "PONG";

/// One protocol command, as carried by one line on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `NICK:<name>` (client to server)
    SetNickname(String),
    /// `MSG:<text>` (client to server)
    ChatMessage(String),
    /// `PING` (either direction)
    Ping,
    /// `PONG` (either direction)
    Pong,
    /// `FROM:<nick>:<text>` (server to client)
    IncomingChat { nickname: String, text: String },
    /// `INFO:<text>` (server to client)
    IncomingInfo(String),
    /// Any line matching none of the above; ignored by both peers
    Unrecognized(String),
}

impl Command {
    /// Classify a logical line.
    ///
    /// Never fails: lines that match no command become
    /// [`Command::Unrecognized`].
    pub fn decode(line: &str) -> Self {
        if let Some(name) = line.strip_prefix(NICK_PREFIX) {
            let name = if name.is_empty() { DEFAULT_NICKNAME } else { name };
            return Self::SetNickname(name.to_string());
        }
        if let Some(text) = line.strip_prefix(MSG_PREFIX) {
            return Self::ChatMessage(text.to_string());
        }
        if line == PING {
            return Self::Ping;
        }
        if line == PONG {
            return Self::Pong;
        }
        if let Some(rest) = line.strip_prefix(FROM_PREFIX) {
            return match rest.split_once(':') {
                Some((nickname, text)) => Self::IncomingChat {
                    nickname: nickname.to_string(),
                    text: text.to_string(),
                },
                None => Self::Unrecognized(line.to_string()),
            };
        }
        if let Some(text) = line.strip_prefix(INFO_PREFIX) {
            return Self::IncomingInfo(text.to_string());
        }
        Self::Unrecognized(line.to_string())
    }

    /// Render the command as one line, without its delimiter.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Render the command as wire bytes, `\n` included.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut wire = self.encode().into_bytes();
        wire.push(b'\n');
        wire
    }

    /// Shorthand for a system notice.
    pub fn info(text: impl Into<String>) -> Self {
        Self::IncomingInfo(text.into())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetNickname(name) => write!(f, "{NICK_PREFIX}{name}"),
            Self::ChatMessage(text) => write!(f, "{MSG_PREFIX}{text}"),
            Self::Ping => f.write_str(PING),
            Self::Pong => f.write_str(PONG),
            Self::IncomingChat { nickname, text } => write!(f, "{FROM_PREFIX}{nickname}:{text}"),
            Self::IncomingInfo(text) => write!(f, "{INFO_PREFIX}{text}"),
            Self::Unrecognized(line) => f.write_str(line),
        }
    }
}
