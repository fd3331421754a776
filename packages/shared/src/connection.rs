//! Per-socket connection state.
//!
//! A [`Connection`] owns one non-blocking stream together with its frame
//! assembler, lifecycle state and optional display name. It never talks to
//! the reactor; whoever owns the connection also owns its subscription.

use std::{
    fmt,
    io::{ErrorKind, Read, Write},
};

use crate::{
    error::ConnectionError,
    protocol::{Command, FrameAssembler},
};

const READ_CHUNK_SIZE: usize = 512;

/// Opaque identity of an open socket; also its reactor token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketId(usize);

impl SocketId {
    /// Wrap a raw identifier.
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Get the raw identifier.
    pub const fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connect attempt issued yet (client only)
    Idle,
    /// Non-blocking connect in flight (client only)
    Connecting,
    /// Established; reads and writes allowed
    Open,
    /// A drain hit a terminal condition; waiting for the owner to tear down
    Closing,
    /// Torn down; every further operation is a no-op
    Closed,
}

/// Result of draining a readable socket.
#[derive(Debug)]
pub struct Drained {
    /// Commands decoded from every complete line, in arrival order
    pub commands: Vec<Command>,
    /// Set when the drain ended in orderly shutdown, a socket error or a
    /// framing violation; `None` when it stopped on "would block"
    pub closed: Option<ConnectionError>,
}

impl Drained {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
            closed: None,
        }
    }
}

/// One socket plus everything the protocol engine keeps about it.
#[derive(Debug)]
pub struct Connection<S> {
    id: SocketId,
    stream: S,
    frames: FrameAssembler,
    state: ConnectionState,
    display_name: Option<String>,
}

impl<S: Read + Write> Connection<S> {
    /// Wrap a socket whose non-blocking connect has just been issued.
    pub fn connecting(id: SocketId, stream: S, max_line_length: usize) -> Self {
        Self::with_state(id, stream, max_line_length, ConnectionState::Connecting)
    }

    /// Wrap a socket handed out by a listener.
    pub fn accepted(id: SocketId, stream: S, max_line_length: usize) -> Self {
        Self::with_state(id, stream, max_line_length, ConnectionState::Open)
    }

    fn with_state(
        id: SocketId,
        stream: S,
        max_line_length: usize,
        state: ConnectionState,
    ) -> Self {
        Self {
            id,
            stream,
            frames: FrameAssembler::new(max_line_length),
            state,
            display_name: None,
        }
    }

    pub fn id(&self) -> SocketId {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Mutable access to the socket, for (un)subscribing it.
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// `Connecting` → `Open`; returns whether the transition happened.
    pub fn mark_open(&mut self) -> bool {
        if self.state != ConnectionState::Connecting {
            return false;
        }
        self.state = ConnectionState::Open;
        true
    }

    /// Replace the display name, returning the previous one.
    ///
    /// A closing connection may still be named: lines drained before the
    /// peer's shutdown are handled before teardown.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::NotOpen` unless the connection is open or
    /// closing
    pub fn set_display_name(
        &mut self,
        name: impl Into<String>,
    ) -> Result<Option<String>, ConnectionError> {
        if !matches!(self.state, ConnectionState::Open | ConnectionState::Closing) {
            return Err(ConnectionError::NotOpen { state: self.state });
        }
        Ok(self.display_name.replace(name.into()))
    }

    /// Read until the socket reports "would block".
    ///
    /// Every complete line is decoded and returned; a zero-length read, a
    /// socket error or a framing violation stops the loop and moves the
    /// connection to `Closing`. Reading a connection that is not open yields
    /// nothing.
    pub fn drain(&mut self) -> Drained {
        let mut drained = Drained::new();
        if !self.is_open() {
            return drained;
        }

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let closed = loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => break Some(ConnectionError::PeerClosed),
                Ok(n) => {
                    let mut violation = None;
                    for frame in self.frames.feed(&chunk[..n]) {
                        match frame {
                            Ok(line) => {
                                tracing::trace!("{} <- {}", self.id, line);
                                drained.commands.push(Command::decode(&line));
                            }
                            Err(e) => violation = Some(ConnectionError::Frame(e)),
                        }
                    }
                    if violation.is_some() {
                        break violation;
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break None,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => break Some(ConnectionError::Io(e)),
            }
        };

        if closed.is_some() {
            self.state = ConnectionState::Closing;
        }
        drained.closed = closed;
        drained
    }

    /// Encode `command` and write it with its delimiter.
    pub fn send(&mut self, command: &Command) -> Result<(), ConnectionError> {
        self.send_wire(&command.to_wire())
    }

    /// Write pre-rendered wire bytes in a single attempt.
    ///
    /// Nothing is queued: if the socket cannot take every byte right now
    /// the write fails with `ConnectionError::WouldBlock`, which callers
    /// treat like any other fatal send error.
    pub fn send_wire(&mut self, mut wire: &[u8]) -> Result<(), ConnectionError> {
        if !self.is_open() {
            return Err(ConnectionError::NotOpen { state: self.state });
        }
        while !wire.is_empty() {
            match self.stream.write(wire) {
                Ok(0) => return Err(ConnectionError::WriteZero),
                Ok(n) => wire = &wire[n..],
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    return Err(ConnectionError::WouldBlock);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ConnectionError::Io(e)),
            }
        }
        Ok(())
    }

    /// Final teardown: drop buffered input and refuse further I/O.
    pub fn close(&mut self) {
        self.state = ConnectionState::Closed;
        self.frames.clear();
    }
}
