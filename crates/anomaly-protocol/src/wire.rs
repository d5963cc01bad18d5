//! Fixed-width little-endian scalar reads.
//!
//! The free functions project a scalar out of a byte slice at an absolute
//! offset. [`WireCursor`] tracks the offset for sequential records. Every
//! read is bounds-checked and reports [`DecodeError::Truncated`] instead of
//! reading past the payload.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{DecodeError, EncodeError, Result};

fn read_array<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N]> {
    offset
        .checked_add(N)
        .and_then(|end| buf.get(offset..end))
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(DecodeError::Truncated {
            offset,
            needed: N,
            available: buf.len().saturating_sub(offset),
        })
}

/// Read a byte at `offset`.
pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8> {
    read_array::<1>(buf, offset).map(|[b]| b)
}

/// Read a little-endian u16 at `offset`.
pub fn read_u16(buf: &[u8], offset: usize) -> Result<u16> {
    read_array(buf, offset).map(u16::from_le_bytes)
}

/// Read a little-endian u32 at `offset`.
pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32> {
    read_array(buf, offset).map(u32::from_le_bytes)
}

/// Read a little-endian IEEE-754 f32 at `offset`.
pub fn read_f32(buf: &[u8], offset: usize) -> Result<f32> {
    read_array(buf, offset).map(f32::from_le_bytes)
}

/// Append a `u32` length or count prefix, refusing values it cannot hold.
pub fn put_len(
    dst: &mut BytesMut,
    field: &'static str,
    len: usize,
) -> std::result::Result<(), EncodeError> {
    let prefix = u32::try_from(len).map_err(|_| EncodeError::TooLong { field, len })?;
    dst.put_u32_le(prefix);
    Ok(())
}

/// Sequential reader over a message payload.
#[derive(Debug, Clone)]
pub struct WireCursor<'a> {
    buf: &'a Bytes,
    pos: usize,
}

impl<'a> WireCursor<'a> {
    /// Start reading at the beginning of `buf`.
    pub fn new(buf: &'a Bytes) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the payload.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the current offset.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether every byte of the payload has been read.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read one byte and advance past it.
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = read_u8(self.buf, self.pos)?;
        self.pos += 1;
        Ok(value)
    }

    /// Read a little-endian u16 and advance past it.
    pub fn read_u16(&mut self) -> Result<u16> {
        let value = read_u16(self.buf, self.pos)?;
        self.pos += 2;
        Ok(value)
    }

    /// Read a little-endian u32 and advance past it.
    pub fn read_u32(&mut self) -> Result<u32> {
        let value = read_u32(self.buf, self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    /// Read a little-endian f32 and advance past it.
    pub fn read_f32(&mut self) -> Result<f32> {
        let value = read_f32(self.buf, self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    /// Take the next `len` bytes as a zero-copy slice of the payload.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        if len > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = self.buf.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(bytes)
    }

    /// Read a `u32` record count and check that `count` records of at
    /// least `min_record_size` bytes fit in what is left.
    pub fn read_count(&mut self, min_record_size: usize) -> Result<usize> {
        let count = self.read_u32()?;
        let needed = (count as usize).checked_mul(min_record_size);
        match needed {
            Some(needed) if needed <= self.remaining() => Ok(count as usize),
            _ => Err(DecodeError::TooManyRecords {
                count,
                remaining: self.remaining(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_scalars() {
        let buf = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0x00, 0x00, 0x80, 0x3F];
        assert_eq!(read_u16(&buf, 0).unwrap(), 0x1234);
        assert_eq!(read_u32(&buf, 2).unwrap(), 0x1234_5678);
        assert_eq!(read_f32(&buf, 6).unwrap(), 1.0);
        assert_eq!(read_u8(&buf, 9).unwrap(), 0x3F);
    }

    #[test]
    fn out_of_bounds_reports_truncation() {
        let buf = [0u8; 5];
        assert_eq!(
            read_u32(&buf, 2),
            Err(DecodeError::Truncated {
                offset: 2,
                needed: 4,
                available: 3
            })
        );
        assert_eq!(
            read_u16(&buf, 9),
            Err(DecodeError::Truncated {
                offset: 9,
                needed: 2,
                available: 0
            })
        );
    }

    #[test]
    fn offset_overflow_is_truncation() {
        let buf = [0u8; 4];
        assert!(matches!(
            read_u32(&buf, usize::MAX - 1),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn cursor_tracks_offset_and_remaining() {
        let buf = Bytes::from_static(&[1, 0, 2, 0, 0, 0, b'h', b'i']);
        let mut cursor = WireCursor::new(&buf);

        assert_eq!(cursor.read_u16().unwrap(), 1);
        assert_eq!(cursor.read_u32().unwrap(), 2);
        assert_eq!(cursor.position(), 6);
        assert_eq!(cursor.remaining(), 2);

        let text = cursor.read_bytes(2).unwrap();
        assert_eq!(text.as_ref(), b"hi");
        assert!(cursor.is_empty());
    }

    #[test]
    fn cursor_does_not_advance_on_failure() {
        let buf = Bytes::from_static(&[1, 2, 3]);
        let mut cursor = WireCursor::new(&buf);

        assert!(cursor.read_u32().is_err());
        assert_eq!(cursor.position(), 0);
        assert!(cursor.read_bytes(4).is_err());
        assert_eq!(cursor.read_u8().unwrap(), 1);
    }

    #[test]
    fn length_prefix_is_little_endian() {
        let mut buf = BytesMut::new();
        put_len(&mut buf, "text length", 0x0102).unwrap();
        assert_eq!(buf.as_ref(), &[0x02, 0x01, 0, 0]);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn length_beyond_u32_is_refused() {
        let mut buf = BytesMut::new();
        let len = u32::MAX as usize + 1;
        assert_eq!(
            put_len(&mut buf, "asset length", len),
            Err(EncodeError::TooLong {
                field: "asset length",
                len
            })
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn count_must_fit_remaining_bytes() {
        let buf = Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF, 0, 0]);
        let mut cursor = WireCursor::new(&buf);
        assert_eq!(
            cursor.read_count(8),
            Err(DecodeError::TooManyRecords {
                count: u32::MAX,
                remaining: 2
            })
        );

        let buf = Bytes::from_static(&[2, 0, 0, 0, 7, 7]);
        let mut cursor = WireCursor::new(&buf);
        assert_eq!(cursor.read_count(1).unwrap(), 2);
    }
}
