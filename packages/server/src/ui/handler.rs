//! Readiness notification handlers.
//!
//! Each handler runs to completion and never blocks. Whatever leaves the
//! registry while a handler runs is retired before the handler returns.

use std::{io::ErrorKind, net::SocketAddr};

use linechat_shared::{
    Command, Connection, Drained, Interests, Notification, Readiness, ReadinessSource, SocketId,
};
use mio::net::TcpStream;

use crate::usecase::{
    HeartbeatUseCase, RegisterPeerUseCase, RenamePeerUseCase, SendMessageUseCase,
    UnregisterPeerUseCase,
};

use super::session::{LISTENER_ID, ServerSession};

pub(super) fn dispatch(session: &mut ServerSession, notification: Notification) {
    let Notification { socket, readiness } = notification;
    match readiness {
        Readiness::Incoming => accept_pending(session),
        Readiness::Readable => handle_readable(session, socket),
        Readiness::Closed => handle_hangup(session, socket, "Disconnected"),
        Readiness::Error => handle_hangup(session, socket, "Socket error"),
        Readiness::Wake => tracing::trace!("Reactor woken"),
        Readiness::ConnectComplete => tracing::trace!("Ignoring connect readiness on {}", socket),
    }
}

/// Accept until the listener would block.
fn accept_pending(session: &mut ServerSession) {
    loop {
        match session.listener.accept() {
            Ok((stream, addr)) => admit(session, stream, addr),
            Err(e) if e.kind() == ErrorKind::WouldBlock => break,
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::ConnectionAborted
                        | ErrorKind::ConnectionReset
                        | ErrorKind::Interrupted
                ) =>
            {
                tracing::debug!("Skipping failed accept: {}", e);
            }
            Err(e) => {
                tracing::error!("Accept failed: {}", e);
                break;
            }
        }
    }
}

fn admit(session: &mut ServerSession, stream: TcpStream, addr: SocketAddr) {
    let id = session.next_socket_id();
    let connection = Connection::accepted(id, stream, session.config.max_line_length);

    match RegisterPeerUseCase::new(&mut session.registry).execute(connection) {
        Ok(guest_name) => {
            let Some(entry) = session.registry.get_mut(id) else {
                return;
            };
            if let Err(e) = session
                .reactor
                .subscribe(entry.connection.stream_mut(), id, Interests::PEER)
            {
                tracing::error!("Failed to subscribe {} from {}: {}", id, addr, e);
                session.registry.unregister(id);
                return;
            }
            tracing::info!("{} connected from {} (reserved {})", id, addr, guest_name);
        }
        Err(e) => tracing::warn!("Rejected {} from {}: {}", id, addr, e),
    }
}

fn handle_readable(session: &mut ServerSession, socket: SocketId) {
    let Some(entry) = session.registry.get_mut(socket) else {
        tracing::trace!("Readable on retired {}", socket);
        return;
    };
    let Drained { commands, closed } = entry.connection.drain();

    for command in commands {
        // The peer can be pruned by a broadcast its own command triggered
        if !session.registry.contains(socket) {
            break;
        }
        handle_command(session, socket, command);
    }

    if let Some(reason) = closed {
        if reason.is_orderly() {
            tracing::info!("{} closed the connection", socket);
        } else {
            tracing::warn!("Dropping {}: {}", socket, reason);
        }
        teardown(session, socket);
    }
}

fn handle_command(session: &mut ServerSession, socket: SocketId, command: Command) {
    tracing::debug!("{} -> {:?}", socket, command);
    match command {
        Command::SetNickname(name) => {
            match RenamePeerUseCase::new(&mut session.registry).execute(socket, name) {
                Ok(handled) => session.retire(handled.retired),
                Err(e) => tracing::warn!("Ignoring NICK from {}: {}", socket, e),
            }
        }
        Command::ChatMessage(text) => {
            match SendMessageUseCase::new(&mut session.registry).execute(socket, text) {
                Ok(handled) => session.retire(handled.retired),
                Err(e) => tracing::debug!("Ignoring MSG from {}: {}", socket, e),
            }
        }
        Command::Ping => match HeartbeatUseCase::new(&mut session.registry).execute(socket) {
            Ok(handled) => session.retire(handled.retired),
            Err(e) => tracing::debug!("Ignoring PING from {}: {}", socket, e),
        },
        Command::Pong => tracing::trace!("PONG from {}", socket),
        other => tracing::trace!("Ignoring {:?} from {}", other, socket),
    }
}

fn handle_hangup(session: &mut ServerSession, socket: SocketId, reason: &str) {
    if socket == LISTENER_ID {
        tracing::error!("Listener reported: {}", reason);
        return;
    }
    if !session.registry.contains(socket) {
        tracing::trace!("{} on retired {}", reason, socket);
        return;
    }
    tracing::info!("{}: {}", socket, reason);
    teardown(session, socket);
}

fn teardown(session: &mut ServerSession, socket: SocketId) {
    let retired = UnregisterPeerUseCase::new(&mut session.registry).execute(socket);
    session.retire(retired);
}
