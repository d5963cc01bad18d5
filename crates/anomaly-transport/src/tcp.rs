use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::NetStream;

/// How long `connect` waits for the connection to be established by default.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Resolve `host:port` to the list of candidate socket addresses.
pub fn resolve(host: &str, port: u16) -> Result<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|source| TransportError::Resolve {
            host: host.to_string(),
            source,
        })?
        .collect();

    if addrs.is_empty() {
        return Err(TransportError::NoAddress {
            host: host.to_string(),
        });
    }
    debug!(host, port, candidates = addrs.len(), "resolved hostname");
    Ok(addrs)
}

/// Connect to `host:port`, waiting at most `timeout` overall.
///
/// Candidate addresses are tried in resolution order and share one
/// deadline. The returned stream is in blocking mode.
pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<NetStream> {
    let addrs = resolve(host, port)?;
    let deadline = Instant::now() + timeout;
    let mut last_err = None;

    for addr in addrs {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(TransportError::ConnectTimeout { addr, timeout });
        }

        match TcpStream::connect_timeout(&addr, remaining) {
            Ok(stream) => {
                info!(%addr, "connected");
                return NetStream::from_tcp(stream);
            }
            Err(source) if matches!(source.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                debug!(%addr, "connect attempt timed out");
                last_err = Some(TransportError::ConnectTimeout { addr, timeout });
            }
            Err(source) => {
                debug!(%addr, error = %source, "connect attempt failed");
                last_err = Some(TransportError::Connect { addr, source });
            }
        }
    }

    Err(last_err.unwrap_or_else(|| TransportError::NoAddress {
        host: host.to_string(),
    }))
}

/// TCP listener producing [`NetStream`]s.
///
/// The client never listens; this exists for local peers such as test
/// servers and replay tools.
pub struct NetListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl NetListener {
    /// Bind and listen on `addr` (for example `127.0.0.1:0`).
    pub fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).map_err(|source| TransportError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        let local_addr = listener.local_addr().map_err(|source| TransportError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        info!(%local_addr, "listening");
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Accept an incoming connection (blocking).
    pub fn accept(&self) -> Result<NetStream> {
        let (stream, addr) = self.listener.accept().map_err(TransportError::Accept)?;
        debug!(%addr, "accepted connection");
        NetStream::from_tcp(stream)
    }

    /// The address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}
