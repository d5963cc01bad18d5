//! The connection underneath a [`Client`](crate::Client).

use std::time::{Duration, Instant};

use anomaly_frame::{Channel, Frame, FrameError, FrameReader, FrameWriter};
use anomaly_transport::{NetStream, TransportError};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::Result;

/// Something that happened on the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetEvent {
    /// A complete message arrived.
    Receive(Frame),
    /// The server closed the connection, or it broke.
    Disconnect,
    /// The server went quiet for longer than the peer timeout.
    DisconnectTimeout,
}

impl NetEvent {
    /// Whether this event ends the session.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, NetEvent::Disconnect | NetEvent::DisconnectTimeout)
    }
}

/// A reliable, ordered, message-framed connection to the server.
pub trait Transport {
    /// Queue one message on `channel`, without waiting for the peer to
    /// take it.
    ///
    /// Fails with [`FrameError::ConnectionClosed`] when the peer is gone and
    /// with [`FrameError::BacklogFull`] when it has stopped reading.
    fn send(&mut self, channel: Channel, payload: &[u8]) -> Result<()>;

    /// Push out queued messages the peer could not take earlier. Never
    /// waits. Transports that never queue keep the default.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Next pending event, without waiting. `Ok(None)` when nothing is
    /// queued.
    fn poll(&mut self) -> Result<Option<NetEvent>>;

    /// Drop the connection immediately, without notifying the peer first.
    fn disconnect_now(&mut self);
}

/// [`Transport`] over a non-blocking TCP stream.
pub struct TcpSession {
    reader: FrameReader<NetStream>,
    writer: FrameWriter<NetStream>,
    peer_timeout: Option<Duration>,
    connected_at: Instant,
    closed: bool,
}

impl TcpSession {
    /// Resolve `host`, connect within `config.connect_timeout`, and switch
    /// the stream to non-blocking mode.
    pub fn connect(
        host: &str,
        port: u16,
        config: &ClientConfig,
    ) -> std::result::Result<Self, TransportError> {
        let stream = anomaly_transport::connect(host, port, config.connect_timeout)?;
        Self::from_stream(stream, config)
    }

    /// Wrap an already connected stream.
    pub fn from_stream(
        stream: NetStream,
        config: &ClientConfig,
    ) -> std::result::Result<Self, TransportError> {
        stream.set_nonblocking(true)?;
        let reader_stream = stream.try_clone()?;
        let frame_config = config.frame_config();

        Ok(Self {
            reader: FrameReader::with_config(reader_stream, frame_config.clone()),
            writer: FrameWriter::with_config(stream, frame_config),
            peer_timeout: config.peer_timeout,
            connected_at: Instant::now(),
            closed: false,
        })
    }

    fn timed_out(&self) -> bool {
        let Some(timeout) = self.peer_timeout else {
            return false;
        };
        let last = self.reader.last_read().unwrap_or(self.connected_at);
        last.elapsed() >= timeout
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.writer.get_ref().shutdown() {
            debug!(error = %err, "socket shutdown failed");
        }
    }
}

impl Transport for TcpSession {
    fn send(&mut self, channel: Channel, payload: &[u8]) -> Result<()> {
        if self.closed {
            return Err(FrameError::ConnectionClosed.into());
        }
        self.writer.send(channel, payload)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.closed {
            return Err(FrameError::ConnectionClosed.into());
        }
        self.writer.flush()?;
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<NetEvent>> {
        if self.closed {
            return Ok(None);
        }
        loop {
            match self.reader.try_read_frame() {
                Ok(Some(frame)) => return Ok(Some(NetEvent::Receive(frame))),
                Ok(None) => break,
                Err(FrameError::UnknownChannel(id)) => {
                    warn!(channel = id, "dropping message on unknown channel");
                }
                Err(FrameError::ConnectionClosed) => {
                    info!("server closed the connection");
                    self.close();
                    return Ok(Some(NetEvent::Disconnect));
                }
                Err(err) => {
                    warn!(error = %err, "connection failed");
                    self.close();
                    return Ok(Some(NetEvent::Disconnect));
                }
            }
        }

        if self.timed_out() {
            info!("server stopped responding");
            self.close();
            return Ok(Some(NetEvent::DisconnectTimeout));
        }
        Ok(None)
    }

    fn disconnect_now(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for TcpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpSession")
            .field("stream", self.writer.get_ref())
            .field("backlog", &self.writer.pending())
            .field("peer_timeout", &self.peer_timeout)
            .field("closed", &self.closed)
            .finish()
    }
}
