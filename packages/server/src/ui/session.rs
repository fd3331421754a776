//! Server session: listener, reactor and registry owned by one thread.

use std::net::SocketAddr;

use linechat_shared::{Interests, MioReactor, ReadinessSource, ShutdownHandle, SocketId};
use mio::net::{TcpListener, TcpStream};

use crate::{
    config::ServerConfig,
    error::ServerError,
    infrastructure::{ConnectionRegistry, Retired},
};

use super::handler;

/// Reactor id of the listening socket; peers are numbered from 1.
pub const LISTENER_ID: SocketId = SocketId::new(0);

/// Everything one running server owns.
///
/// No state is shared with other threads apart from the shutdown handle.
pub struct ServerSession {
    pub(super) reactor: MioReactor,
    pub(super) listener: TcpListener,
    pub(super) registry: ConnectionRegistry<TcpStream>,
    pub(super) config: ServerConfig,
    next_id: usize,
    local_addr: SocketAddr,
    shutdown: ShutdownHandle,
}

impl ServerSession {
    /// Bind the listener and subscribe it to a fresh reactor.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the address is unavailable and
    /// `ServerError::Reactor` if the reactor cannot be created.
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let addr = config.bind_addr();
        let mut listener =
            TcpListener::bind(addr).map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        let mut reactor = MioReactor::new(config.event_capacity)?;
        reactor.subscribe(&mut listener, LISTENER_ID, Interests::LISTENER)?;
        let shutdown = reactor.shutdown_handle();

        Ok(Self {
            reactor,
            listener,
            registry: ConnectionRegistry::new(config.max_connections),
            config,
            next_id: LISTENER_ID.value() + 1,
            local_addr,
            shutdown,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle other threads use to stop [`run`](Self::run).
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Dispatch readiness notifications until shutdown is requested, then
    /// close every connection.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Reactor` if waiting on the reactor fails.
    pub fn run(&mut self) -> Result<(), ServerError> {
        tracing::info!("Listening on {}", self.local_addr);

        let mut notifications = Vec::with_capacity(self.config.event_capacity);
        while !self.shutdown.is_triggered() {
            notifications.clear();
            self.reactor.wait(&mut notifications, None)?;
            for notification in notifications.drain(..) {
                handler::dispatch(self, notification);
                debug_assert_eq!(
                    self.reactor.subscription_count(),
                    self.registry.len() + 1,
                    "subscriptions out of step with the registry"
                );
            }
        }

        tracing::info!("Shutting down with {} connection(s)", self.registry.len());
        self.close_all();
        Ok(())
    }

    pub(super) fn next_socket_id(&mut self) -> SocketId {
        let id = SocketId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Unsubscribe and close entries that left the registry.
    pub(super) fn retire(&mut self, retired: Retired<TcpStream>) {
        for mut entry in retired {
            let id = entry.id();
            if let Err(e) = self.reactor.unsubscribe(entry.connection.stream_mut(), id) {
                tracing::warn!("Failed to unsubscribe {}: {}", id, e);
            }
            entry.connection.close();
            tracing::debug!("Closed {}", id);
        }
    }

    fn close_all(&mut self) {
        let retired = self.registry.drain_all();
        self.retire(retired);
        if let Err(e) = self.reactor.unsubscribe(&mut self.listener, LISTENER_ID) {
            tracing::warn!("Failed to unsubscribe listener: {}", e);
        }
    }
}
