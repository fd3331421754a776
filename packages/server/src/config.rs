//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use linechat_shared::{DEFAULT_MAX_LINE_LENGTH, reactor::DEFAULT_EVENT_CAPACITY};

use crate::infrastructure::DEFAULT_CAPACITY;

/// Default listening port
pub const DEFAULT_PORT: u16 = 6667;

/// Settings for one server session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the listener to
    pub host: IpAddr,
    pub port: u16,
    /// Bytes a peer may send without a newline before it is disconnected
    pub max_line_length: usize,
    /// Maximum number of registered connections
    pub max_connections: usize,
    /// Readiness events fetched per reactor wait
    pub event_capacity: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_connections: DEFAULT_CAPACITY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // テスト項目: 既定の設定は 0.0.0.0:6667、行の上限 4096、上限 64 接続
        // given (前提条件):
        let config = ServerConfig::default();

        // then (期待する結果):
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:6667");
        assert_eq!(config.max_line_length, 4096);
        assert_eq!(config.max_connections, 64);
        assert_eq!(config.event_capacity, 256);
    }
}
