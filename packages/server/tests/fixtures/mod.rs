//! Shared helpers for socket-level server tests.

#![allow(dead_code)]

use std::{
    net::{Ipv4Addr, SocketAddr},
    thread::JoinHandle,
    time::Duration,
};

use linechat_server::{ServerConfig, ServerError, ServerSession};
use linechat_shared::ShutdownHandle;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    time::timeout,
};

const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// A server session running on its own thread, bound to an ephemeral
/// localhost port and shut down on drop.
pub struct TestServer {
    addr: SocketAddr,
    shutdown: ShutdownHandle,
    thread: Option<JoinHandle<Result<(), ServerError>>>,
}

impl TestServer {
    pub fn start() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let config = ServerConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            ..config
        };
        let mut session = ServerSession::bind(config).expect("Failed to bind test server");
        let addr = session.local_addr();
        let shutdown = session.shutdown_handle();
        let thread = std::thread::spawn(move || session.run());

        Self {
            addr,
            shutdown,
            thread: Some(thread),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.shutdown.trigger();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// A raw protocol client.
pub struct Peer {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Peer {
    pub async fn connect(server: &TestServer) -> Self {
        let stream = TcpStream::connect(server.addr())
            .await
            .expect("Failed to connect to test server");
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    /// Connect and wait until the server has registered the peer.
    pub async fn join(server: &TestServer) -> Self {
        let mut peer = Self::connect(server).await;
        peer.sync().await;
        peer
    }

    /// Connect, register and pick a nickname.
    pub async fn named(server: &TestServer, nickname: &str) -> Self {
        let mut peer = Self::join(server).await;
        peer.send(&format!("NICK:{nickname}")).await;
        peer.sync().await;
        peer
    }

    pub async fn send(&mut self, line: &str) {
        self.send_raw(format!("{line}\n").as_bytes()).await;
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer
            .write_all(bytes)
            .await
            .expect("Failed to write to test server");
    }

    /// Round-trip a PING; every line the server sent before the PONG is
    /// returned.
    pub async fn sync(&mut self) -> Vec<String> {
        self.send("PING").await;
        let mut before = Vec::new();
        loop {
            let line = self.recv().await;
            if line == "PONG" {
                return before;
            }
            before.push(line);
        }
    }

    pub async fn recv(&mut self) -> String {
        timeout(READ_TIMEOUT, self.lines.next_line())
            .await
            .expect("Timed out waiting for a line")
            .expect("Failed to read from test server")
            .expect("Server closed the connection")
    }

    /// Wait for the server to close the connection, returning any lines
    /// received before that.
    pub async fn recv_until_closed(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        loop {
            match timeout(READ_TIMEOUT, self.lines.next_line())
                .await
                .expect("Timed out waiting for the server to close")
            {
                Ok(Some(line)) => lines.push(line),
                Ok(None) | Err(_) => return lines,
            }
        }
    }
}
