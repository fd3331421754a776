//! Non-blocking connect: resolve, try each address, probe completion.

use std::{
    io::{self, ErrorKind},
    net::{SocketAddr, ToSocketAddrs},
};

use linechat_shared::{Interests, ReadinessSource, SocketId};
use mio::net::TcpStream;

use crate::error::ClientError;

/// Where a pending connect stands after a connect-ready notification.
#[derive(Debug)]
pub enum ConnectStatus {
    Connected(SocketAddr),
    /// Spurious wake-up; keep waiting
    Pending,
    Failed(io::Error),
}

/// Resolve `host:port` to every candidate address.
///
/// # Errors
///
/// Returns `ClientError::Resolve` if the lookup fails or yields nothing.
pub fn resolve(host: &str, port: u16) -> Result<Vec<SocketAddr>, ClientError> {
    let target = format!("{host}:{port}");
    let addrs: Vec<_> = (host, port)
        .to_socket_addrs()
        .map_err(|source| ClientError::Resolve {
            target: target.clone(),
            source,
        })?
        .collect();
    if addrs.is_empty() {
        return Err(ClientError::Resolve {
            target,
            source: io::Error::new(ErrorKind::NotFound, "no addresses"),
        });
    }
    Ok(addrs)
}

/// Start a non-blocking connect to the first address that accepts one and
/// subscribe it under `id`.
///
/// # Errors
///
/// Returns `ClientError::ConnectFailed` when every address fails and
/// `ClientError::Io` when the socket cannot be subscribed.
pub fn connect<R: ReadinessSource>(
    reactor: &mut R,
    id: SocketId,
    addrs: &[SocketAddr],
) -> Result<(TcpStream, SocketAddr), ClientError> {
    for &addr in addrs {
        match TcpStream::connect(addr) {
            Ok(mut stream) => {
                reactor.subscribe(&mut stream, id, Interests::CLIENT)?;
                return Ok((stream, addr));
            }
            Err(e) => tracing::debug!("Connect to {} failed: {}", addr, e),
        }
    }
    let target = addrs
        .first()
        .map_or_else(|| "<none>".to_string(), SocketAddr::to_string);
    Err(ClientError::ConnectFailed { target })
}

/// Check whether a non-blocking connect has finished.
pub fn connect_status(stream: &TcpStream) -> ConnectStatus {
    match stream.take_error() {
        Ok(Some(e)) | Err(e) => return ConnectStatus::Failed(e),
        Ok(None) => {}
    }
    match stream.peer_addr() {
        Ok(addr) => ConnectStatus::Connected(addr),
        Err(e) if e.kind() == ErrorKind::NotConnected => ConnectStatus::Pending,
        Err(e) => ConnectStatus::Failed(e),
    }
}
