//! Client session state machine.
//!
//! The session owns at most one [`Connection`] and turns socket readiness
//! and user requests into [`SessionEvent`]s. It never touches the reactor:
//! a connection it tears down is parked until the owner collects it with
//! [`ClientSession::take_retired`] and unsubscribes it.

use std::{
    fmt,
    io::{Read, Write},
    mem,
};

use linechat_shared::{Command, Connection, ConnectionError, ConnectionState, SocketId};

use crate::error::ClientError;

pub const REASON_SERVER_CLOSED: &str = "Server closed the connection.";
pub const REASON_DROPPED: &str = "Connection dropped.";
pub const REASON_SOCKET_ERROR: &str = "Socket error.";
pub const REASON_DISCONNECTED: &str = "Disconnected.";
pub const REASON_LINE_TOO_LONG: &str = "Line too long.";
pub const REASON_BY_USER: &str = "Disconnected by user.";

/// Something the user should see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connecting { target: String },
    Connected,
    Chat { nickname: String, text: String },
    Info(String),
    HeartbeatAcknowledged,
    Disconnected { reason: String },
}

pub struct ClientSession<S> {
    connection: Option<Connection<S>>,
    retired: Vec<Connection<S>>,
    nickname: String,
    max_line_length: usize,
    events: Vec<SessionEvent>,
}

impl<S> fmt::Debug for ClientSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSession")
            .field("connected", &self.connection.is_some())
            .field("nickname", &self.nickname)
            .finish_non_exhaustive()
    }
}

impl<S: Read + Write> ClientSession<S> {
    pub fn new(nickname: impl Into<String>, max_line_length: usize) -> Self {
        Self {
            connection: None,
            retired: Vec::new(),
            nickname: nickname.into(),
            max_line_length,
            events: Vec::new(),
        }
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// `Idle` when no connection is attached.
    pub fn state(&self) -> ConnectionState {
        self.connection
            .as_ref()
            .map_or(ConnectionState::Idle, Connection::state)
    }

    pub fn is_idle(&self) -> bool {
        self.connection.is_none()
    }

    pub fn socket_id(&self) -> Option<SocketId> {
        self.connection.as_ref().map(Connection::id)
    }

    pub fn stream(&self) -> Option<&S> {
        self.connection.as_ref().map(Connection::stream)
    }

    pub fn stream_mut(&mut self) -> Option<&mut S> {
        self.connection.as_mut().map(Connection::stream_mut)
    }

    /// Adopt a socket whose non-blocking connect has been issued.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::AlreadyConnected` (and hands the stream back)
    /// while another connection is attached.
    pub fn attach(
        &mut self,
        id: SocketId,
        stream: S,
        target: &str,
    ) -> Result<(), (ClientError, S)> {
        if self.connection.is_some() {
            return Err((ClientError::AlreadyConnected, stream));
        }
        tracing::info!("Connecting to {} as {}", target, id);
        self.connection = Some(Connection::connecting(id, stream, self.max_line_length));
        self.events.push(SessionEvent::Connecting {
            target: target.to_string(),
        });
        Ok(())
    }

    /// The connect completed: open the connection and introduce ourselves.
    pub fn on_connect_ready(&mut self) {
        let Some(connection) = self.connection.as_mut() else {
            return;
        };
        if !connection.mark_open() {
            return;
        }
        tracing::info!("Connected");
        self.events.push(SessionEvent::Connected);
        let hello = Command::SetNickname(self.nickname.clone());
        self.send_or_drop(&hello);
    }

    /// The connect attempt failed.
    pub fn connect_failed(&mut self, error: impl fmt::Display) {
        self.teardown(&format!("Connection failed: {error}"));
    }

    /// Drain the socket and handle every line the server sent.
    pub fn on_readable(&mut self) {
        let Some(connection) = self.connection.as_mut() else {
            return;
        };
        let drained = connection.drain();

        for command in drained.commands {
            match command {
                Command::IncomingChat { nickname, text } => {
                    self.events.push(SessionEvent::Chat { nickname, text });
                }
                Command::IncomingInfo(text) => self.events.push(SessionEvent::Info(text)),
                Command::Pong => self.events.push(SessionEvent::HeartbeatAcknowledged),
                Command::Ping => self.send_or_drop(&Command::Pong),
                other => tracing::trace!("Ignoring {:?}", other),
            }
        }

        if let Some(error) = drained.closed {
            let reason = match error {
                ConnectionError::PeerClosed => REASON_SERVER_CLOSED,
                ConnectionError::Frame(_) => REASON_LINE_TOO_LONG,
                _ => REASON_DROPPED,
            };
            tracing::info!("Connection ended: {}", error);
            self.teardown(reason);
        }
    }

    /// The reactor reported a hang-up or socket error.
    pub fn on_hangup(&mut self, reason: &str) {
        self.teardown(reason);
    }

    /// Send chat text; empty text is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotConnected` unless the connection is open and
    /// `ClientError::Connection` if the write failed (the session has then
    /// torn the connection down).
    pub fn send_chat(&mut self, text: &str) -> Result<(), ClientError> {
        if text.is_empty() {
            tracing::trace!("Ignoring empty chat message");
            return Ok(());
        }
        self.send(&Command::ChatMessage(text.to_string()))
    }

    /// Remember `name` for future connects and announce it now if open.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Connection` if the write failed.
    pub fn set_nickname(&mut self, name: &str) -> Result<(), ClientError> {
        self.nickname = name.to_string();
        if self.state() != ConnectionState::Open {
            return Ok(());
        }
        self.send(&Command::SetNickname(self.nickname.clone()))
    }

    /// # Errors
    ///
    /// Same as [`send_chat`](Self::send_chat).
    pub fn ping(&mut self) -> Result<(), ClientError> {
        self.send(&Command::Ping)
    }

    /// Close the connection at the user's request.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotConnected` when nothing is attached.
    pub fn disconnect(&mut self) -> Result<(), ClientError> {
        if self.connection.is_none() {
            return Err(ClientError::NotConnected);
        }
        self.teardown(REASON_BY_USER);
        Ok(())
    }

    /// Connections torn down since the last call, oldest first, to be
    /// unsubscribed.
    pub fn take_retired(&mut self) -> Vec<Connection<S>> {
        mem::take(&mut self.retired)
    }

    /// Events produced since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.events)
    }

    fn send(&mut self, command: &Command) -> Result<(), ClientError> {
        let connection = self
            .connection
            .as_mut()
            .filter(|connection| connection.is_open())
            .ok_or(ClientError::NotConnected)?;
        if let Err(e) = connection.send(command) {
            tracing::warn!("Send failed: {}", e);
            self.teardown(REASON_DROPPED);
            return Err(e.into());
        }
        tracing::debug!("-> {}", command);
        Ok(())
    }

    fn send_or_drop(&mut self, command: &Command) {
        if let Err(e) = self.send(command) {
            tracing::debug!("Could not send {}: {}", command, e);
        }
    }

    fn teardown(&mut self, reason: &str) {
        let Some(mut connection) = self.connection.take() else {
            return;
        };
        connection.close();
        tracing::info!("Disconnected {}: {}", connection.id(), reason);
        self.retired.push(connection);
        self.events.push(SessionEvent::Disconnected {
            reason: reason.to_string(),
        });
    }
}
