//! Readiness reactor.
//!
//! Owners subscribe their sockets with a fixed set of [`Interests`] and then
//! pull [`Notification`]s out of [`ReadinessSource::wait`], handling each one
//! to completion before looking at the next. The reactor only remembers which
//! id was subscribed with which interests; it never owns a socket.

use std::{
    collections::HashMap,
    io::{self, ErrorKind},
    ops::BitOr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use mio::{Events, Interest, Poll, Token, Waker, event::Source};

use crate::connection::SocketId;

/// Default number of readiness events fetched per wait
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

const WAKE_TOKEN: Token = Token(usize::MAX);

/// Set of readiness kinds a socket is subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interests(u8);

impl Interests {
    /// A listener has a connection waiting to be accepted
    pub const INCOMING: Self = Self(0b0001);
    /// A non-blocking connect finished (successfully or not)
    pub const CONNECT: Self = Self(0b0010);
    /// Bytes can be read
    pub const READABLE: Self = Self(0b0100);
    /// The socket was closed or failed
    pub const CLOSED: Self = Self(0b1000);

    /// Listening socket: {incoming-connection, closed}
    pub const LISTENER: Self = Self(Self::INCOMING.0 | Self::CLOSED.0);
    /// Outgoing client socket: {connect-complete, readable, closed}
    pub const CLIENT: Self = Self(Self::CONNECT.0 | Self::READABLE.0 | Self::CLOSED.0);
    /// Accepted peer socket: {readable, closed}
    pub const PEER: Self = Self(Self::READABLE.0 | Self::CLOSED.0);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    fn to_mio(self) -> Interest {
        // closure is reported on the read side, so every socket watches it
        if self.contains(Self::CONNECT) {
            Interest::READABLE | Interest::WRITABLE
        } else {
            Interest::READABLE
        }
    }
}

impl BitOr for Interests {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// What became ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Listener: accept until "would block"
    Incoming,
    /// Outgoing socket: connect attempt finished
    ConnectComplete,
    /// Drain until "would block"
    Readable,
    /// Peer hung up
    Closed,
    /// The socket reported an error
    Error,
    /// Another thread called the reactor's waker
    Wake,
}

/// One readiness notification for one subscribed socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub socket: SocketId,
    pub readiness: Readiness,
}

/// Anything that can watch sockets and report readiness.
pub trait ReadinessSource {
    /// Start (or change) watching `socket` under `id`.
    fn subscribe<S>(
        &mut self,
        socket: &mut S,
        id: SocketId,
        interests: Interests,
    ) -> io::Result<()>
    where
        S: Source + ?Sized;

    /// Stop watching `socket`; unknown ids are ignored.
    fn unsubscribe<S>(&mut self, socket: &mut S, id: SocketId) -> io::Result<()>
    where
        S: Source + ?Sized;

    /// Block until at least one notification is ready (or `timeout` passes)
    /// and append the notifications to `out`.
    fn wait(&mut self, out: &mut Vec<Notification>, timeout: Option<Duration>) -> io::Result<()>;

    fn is_subscribed(&self, id: SocketId) -> bool;

    fn subscription_count(&self) -> usize;
}

/// [`ReadinessSource`] backed by `mio::Poll`.
pub struct MioReactor {
    poll: Poll,
    events: Events,
    waker: Arc<Waker>,
    shutdown_requested: Arc<AtomicBool>,
    subscriptions: HashMap<SocketId, Interests>,
}

impl MioReactor {
    pub fn new(event_capacity: usize) -> io::Result<Self> {
        let poll = Poll::new()?;
        let waker = Arc::new(Waker::new(poll.registry(), WAKE_TOKEN)?);
        Ok(Self {
            poll,
            events: Events::with_capacity(event_capacity),
            waker,
            shutdown_requested: Arc::new(AtomicBool::new(false)),
            subscriptions: HashMap::new(),
        })
    }

    /// Waker that makes a blocked [`ReadinessSource::wait`] return a
    /// [`Readiness::Wake`] notification.
    pub fn waker(&self) -> Arc<Waker> {
        self.waker.clone()
    }

    /// Handle that asks the reactor loop to stop. Every handle from one
    /// reactor shares the same flag.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            requested: self.shutdown_requested.clone(),
            waker: self.waker(),
        }
    }

    fn translate(
        interests: Interests,
        event: &mio::event::Event,
        socket: SocketId,
        out: &mut Vec<Notification>,
    ) {
        let mut push = |readiness| out.push(Notification { socket, readiness });

        if event.is_error() {
            push(Readiness::Error);
            return;
        }
        if event.is_writable() && interests.contains(Interests::CONNECT) {
            push(Readiness::ConnectComplete);
        }
        if event.is_readable() {
            if interests.contains(Interests::INCOMING) {
                push(Readiness::Incoming);
            } else if interests.contains(Interests::READABLE) {
                push(Readiness::Readable);
            }
        }
        let closed = event.is_read_closed() || event.is_write_closed();
        if closed && interests.contains(Interests::CLOSED) {
            push(Readiness::Closed);
        }
    }
}

impl ReadinessSource for MioReactor {
    fn subscribe<S>(
        &mut self,
        socket: &mut S,
        id: SocketId,
        interests: Interests,
    ) -> io::Result<()>
    where
        S: Source + ?Sized,
    {
        let token = Token(id.value());
        if self.subscriptions.contains_key(&id) {
            self.poll.registry().reregister(socket, token, interests.to_mio())?;
        } else {
            self.poll.registry().register(socket, token, interests.to_mio())?;
        }
        self.subscriptions.insert(id, interests);
        tracing::trace!("Subscribed {} with {:?}", id, interests);
        Ok(())
    }

    fn unsubscribe<S>(&mut self, socket: &mut S, id: SocketId) -> io::Result<()>
    where
        S: Source + ?Sized,
    {
        if self.subscriptions.remove(&id).is_none() {
            return Ok(());
        }
        tracing::trace!("Unsubscribed {}", id);
        self.poll.registry().deregister(socket)
    }

    fn wait(&mut self, out: &mut Vec<Notification>, timeout: Option<Duration>) -> io::Result<()> {
        match self.poll.poll(&mut self.events, timeout) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => return Ok(()),
            Err(e) => return Err(e),
        }

        for event in self.events.iter() {
            if event.token() == WAKE_TOKEN {
                out.push(Notification {
                    socket: SocketId::new(WAKE_TOKEN.0),
                    readiness: Readiness::Wake,
                });
                continue;
            }
            let socket = SocketId::new(event.token().0);
            let Some(&interests) = self.subscriptions.get(&socket) else {
                tracing::trace!("Dropping event for unsubscribed {}", socket);
                continue;
            };
            Self::translate(interests, event, socket, out);
        }
        Ok(())
    }

    fn is_subscribed(&self, id: SocketId) -> bool {
        self.subscriptions.contains_key(&id)
    }

    fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

/// Cross-thread request to stop a reactor loop.
#[derive(Clone)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,
    waker: Arc<Waker>,
}

impl ShutdownHandle {
    /// Raise the flag and wake the reactor so it notices.
    pub fn trigger(&self) -> io::Result<()> {
        self.requested.store(true, Ordering::SeqCst);
        self.waker.wake()
    }

    pub fn is_triggered(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}
