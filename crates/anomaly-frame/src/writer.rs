use std::io::{ErrorKind, Write};

use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::channel::Channel;
use crate::codec::{encode_frame, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Writes complete frames to any `Write` stream.
///
/// Frames are appended whole to an outbound backlog and written from its
/// front, so they are never interleaved. On a non-blocking stream a write
/// that would block leaves the rest queued for the next [`flush`](Self::flush)
/// instead of waiting. A blocking stream always drains the backlog.
pub struct FrameWriter<T> {
    inner: T,
    pending: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            pending: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Queue a payload on a channel and write as much as the stream takes.
    ///
    /// Fails with [`FrameError::BacklogFull`] when earlier frames are still
    /// unsent and this one would push the backlog past `max_backlog`. An
    /// empty backlog always accepts one frame.
    pub fn send(&mut self, channel: Channel, payload: &[u8]) -> Result<()> {
        if payload.len() > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }

        self.flush()?;
        let queued = self.pending.len();
        if queued > 0 && queued + HEADER_SIZE + payload.len() > self.config.max_backlog {
            return Err(FrameError::BacklogFull {
                queued,
                max: self.config.max_backlog,
            });
        }

        encode_frame(channel, payload, &mut self.pending)?;
        self.flush()
    }

    /// Write queued bytes until the backlog is empty or the stream would
    /// block.
    pub fn flush(&mut self) -> Result<()> {
        while !self.pending.is_empty() {
            match self.inner.write(&self.pending) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => self.pending.advance(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => {
                    trace!(queued = self.pending.len(), "send would block");
                    return Ok(());
                }
                Err(err) => return Err(closed_or_io(err)),
            }
        }

        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(err) => return Err(closed_or_io(err)),
            }
        }
    }

    /// Bytes queued but not yet taken by the stream.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}

fn closed_or_io(err: std::io::Error) -> FrameError {
    match err.kind() {
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => {
            FrameError::ConnectionClosed
        }
        _ => FrameError::Io(err),
    }
}
