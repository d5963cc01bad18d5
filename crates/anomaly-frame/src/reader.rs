use std::io::{ErrorKind, Read};
use std::time::Instant;

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{decode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally: callers always get complete frames.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
    last_read: Option<Instant>,
}

enum Fill {
    Data,
    WouldBlock,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            last_read: None,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = decode_frame(&mut self.buf, self.config.max_payload_size)? {
                return Ok(frame);
            }
            if let Fill::WouldBlock = self.fill()? {
                return Err(FrameError::Io(std::io::Error::from(ErrorKind::WouldBlock)));
            }
        }
    }

    /// Return the next complete frame if one is available without waiting.
    ///
    /// Expects the underlying stream to be in non-blocking mode. Returns
    /// `Ok(None)` once the stream has no more bytes queued and the buffer
    /// holds no complete frame.
    pub fn try_read_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if let Some(frame) = decode_frame(&mut self.buf, self.config.max_payload_size)? {
                return Ok(Some(frame));
            }
            if let Fill::WouldBlock = self.fill()? {
                return Ok(None);
            }
        }
    }

    fn fill(&mut self) -> Result<Fill> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    self.last_read = Some(Instant::now());
                    trace!(bytes = n, buffered = self.buf.len(), "read from stream");
                    return Ok(Fill::Data);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => return Ok(Fill::WouldBlock),
                Err(err)
                    if matches!(
                        err.kind(),
                        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
                    ) =>
                {
                    return Err(FrameError::ConnectionClosed)
                }
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// When bytes were last received from the stream.
    pub fn last_read(&self) -> Option<Instant> {
        self.last_read
    }

    /// Number of buffered bytes not yet returned as a frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::{BufMut, BytesMut};

    use super::*;
    use crate::channel::Channel;
    use crate::codec::{encode_frame, MAGIC};

    #[test]
    fn read_single_frame() {
        let mut wire = BytesMut::new();
        encode_frame(Channel::Sprite, b"hello", &mut wire).unwrap();

        let mut reader = FrameReader::new(Cursor::new(wire.to_vec()));
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.channel, Channel::Sprite);
        assert_eq!(frame.payload.as_ref(), b"hello");
        assert!(reader.last_read().is_some());
    }

    #[test]
    fn read_multiple_frames_in_order() {
        let mut wire = BytesMut::new();
        encode_frame(Channel::Sprite, b"one", &mut wire).unwrap();
        encode_frame(Channel::Command, b"two", &mut wire).unwrap();
        encode_frame(Channel::Content, b"three", &mut wire).unwrap();

        let mut reader = FrameReader::new(Cursor::new(wire.to_vec()));

        let f1 = reader.read_frame().unwrap();
        let f2 = reader.read_frame().unwrap();
        let f3 = reader.read_frame().unwrap();

        assert_eq!(
            (f1.channel, f1.payload.as_ref()),
            (Channel::Sprite, b"one".as_ref())
        );
        assert_eq!(
            (f2.channel, f2.payload.as_ref()),
            (Channel::Command, b"two".as_ref())
        );
        assert_eq!(
            (f3.channel, f3.payload.as_ref()),
            (Channel::Content, b"three".as_ref())
        );
    }

    #[test]
    fn read_frame_with_large_payload() {
        let payload = vec![0xAB; 64 * 1024];
        let mut wire = BytesMut::new();
        encode_frame(Channel::Content, &payload, &mut wire).unwrap();

        let mut reader = FrameReader::new(Cursor::new(wire.to_vec()));
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.channel, Channel::Content);
        assert_eq!(frame.payload.as_ref(), payload.as_slice());
    }

    #[test]
    fn partial_read_handling() {
        let mut wire = BytesMut::new();
        encode_frame(Channel::Audio, b"slow", &mut wire).unwrap();

        let byte_reader = ByteByByteReader {
            bytes: wire.to_vec(),
            pos: 0,
        };
        let mut reader = FrameReader::new(byte_reader);

        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.channel, Channel::Audio);
        assert_eq!(frame.payload.as_ref(), b"slow");
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_frame() {
        let mut partial = BytesMut::new();
        partial.put_slice(&MAGIC);
        partial.put_u32_le(16);
        partial.put_u8(Channel::Sprite.id());
        partial.put_slice(b"only-part");

        let mut reader = FrameReader::new(Cursor::new(partial.to_vec()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_reset_reads_as_closed() {
        let mut reader = FrameReader::new(ScriptedReader::new(vec![Step::Fail(
            ErrorKind::ConnectionReset,
        )]));
        let err = reader.try_read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn invalid_magic_in_stream() {
        let bytes = vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut reader = FrameReader::new(Cursor::new(bytes));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::InvalidMagic));
    }

    #[test]
    fn oversized_frame_in_stream() {
        let mut wire = BytesMut::new();
        wire.put_slice(&MAGIC);
        wire.put_u32_le(1024);
        wire.put_u8(Channel::Content.id());

        let cfg = FrameConfig {
            max_payload_size: 16,
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::with_config(Cursor::new(wire.to_vec()), cfg);
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }

    #[test]
    fn try_read_returns_none_when_drained() {
        let mut wire = BytesMut::new();
        encode_frame(Channel::Sprite, b"a", &mut wire).unwrap();
        encode_frame(Channel::Audio, b"b", &mut wire).unwrap();

        let mut reader = FrameReader::new(ScriptedReader::new(vec![
            Step::Data(wire.to_vec()),
            Step::Fail(ErrorKind::WouldBlock),
        ]));

        let f1 = reader.try_read_frame().unwrap().unwrap();
        let f2 = reader.try_read_frame().unwrap().unwrap();
        assert_eq!(f1.channel, Channel::Sprite);
        assert_eq!(f2.channel, Channel::Audio);
        assert!(reader.try_read_frame().unwrap().is_none());
    }

    #[test]
    fn try_read_keeps_partial_frame_until_complete() {
        let mut wire = BytesMut::new();
        encode_frame(Channel::Content, b"abcdef", &mut wire).unwrap();
        let (head, tail) = wire.split_at(9);

        let mut reader = FrameReader::new(ScriptedReader::new(vec![
            Step::Data(head.to_vec()),
            Step::Fail(ErrorKind::WouldBlock),
            Step::Data(tail.to_vec()),
            Step::Fail(ErrorKind::WouldBlock),
        ]));

        assert!(reader.try_read_frame().unwrap().is_none());
        assert_eq!(reader.buffered(), 9);

        let frame = reader.try_read_frame().unwrap().unwrap();
        assert_eq!(frame.payload.as_ref(), b"abcdef");
        assert_eq!(reader.buffered(), 0);
    }

    #[test]
    fn interrupted_read_retries() {
        let mut wire = BytesMut::new();
        encode_frame(Channel::Command, b"ok", &mut wire).unwrap();

        let mut framed = FrameReader::new(ScriptedReader::new(vec![
            Step::Fail(ErrorKind::Interrupted),
            Step::Data(wire.to_vec()),
        ]));
        let frame = framed.read_frame().unwrap();

        assert_eq!(frame.channel, Channel::Command);
        assert_eq!(frame.payload.as_ref(), b"ok");
    }

    #[test]
    fn blocking_read_reports_would_block() {
        let mut framed = FrameReader::new(ScriptedReader::new(vec![Step::Fail(
            ErrorKind::WouldBlock,
        )]));
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn roundtrip_over_tcp() {
        let listener = anomaly_transport::NetListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().port();

        let server = std::thread::spawn(move || {
            let stream = listener.accept().unwrap();
            let mut writer = crate::writer::FrameWriter::new(stream);
            writer.send(Channel::Sprite, b"frame").unwrap();
            writer.send(Channel::Audio, b"sound").unwrap();
        });

        let stream = anomaly_transport::connect(
            "127.0.0.1",
            port,
            anomaly_transport::DEFAULT_CONNECT_TIMEOUT,
        )
        .unwrap();
        let mut reader = FrameReader::new(stream);

        let f1 = reader.read_frame().unwrap();
        let f2 = reader.read_frame().unwrap();
        assert_eq!(
            (f1.channel, f1.payload.as_ref()),
            (Channel::Sprite, b"frame".as_ref())
        );
        assert_eq!(
            (f2.channel, f2.payload.as_ref()),
            (Channel::Audio, b"sound".as_ref())
        );

        server.join().unwrap();
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    enum Step {
        Data(Vec<u8>),
        Fail(ErrorKind),
    }

    struct ScriptedReader {
        steps: std::collections::VecDeque<Step>,
    }

    impl ScriptedReader {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: steps.into(),
            }
        }
    }

    impl Read for ScriptedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.steps.pop_front() {
                None => Ok(0),
                Some(Step::Fail(kind)) => Err(std::io::Error::from(kind)),
                Some(Step::Data(mut bytes)) => {
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    if n < bytes.len() {
                        self.steps.push_front(Step::Data(bytes.split_off(n)));
                    }
                    Ok(n)
                }
            }
        }
    }
}
