//! Client configuration.

use linechat_shared::{DEFAULT_MAX_LINE_LENGTH, DEFAULT_NICKNAME, reactor::DEFAULT_EVENT_CAPACITY};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 6667;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Name sent with `NICK:` on every connect
    pub nickname: String,
    /// Longest line accepted from the server
    pub max_line_length: usize,
    /// Readiness events fetched per reactor wait
    pub event_capacity: usize,
    /// Connect immediately instead of waiting for `/connect`
    pub auto_connect: bool,
}

impl ClientConfig {
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            nickname: DEFAULT_NICKNAME.to_string(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            auto_connect: true,
        }
    }
}
