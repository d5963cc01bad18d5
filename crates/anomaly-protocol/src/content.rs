//! CONTENT channel: one asset per message.
//!
//! ```text
//! offset 0  u8  type (0 image, 1 font, 2 sound)
//! offset 1  u32 id
//! offset 5  u32 length
//! offset 9  length × u8
//! ```

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{DecodeError, EncodeError, Result};
use crate::wire::{put_len, WireCursor};

/// Size of the type, id and length fields.
pub const CONTENT_HEADER_SIZE: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ContentKind {
    Image = 0,
    Font = 1,
    Sound = 2,
}

impl ContentKind {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            ContentKind::Image => "image",
            ContentKind::Font => "font",
            ContentKind::Sound => "sound",
        }
    }
}

impl TryFrom<u8> for ContentKind {
    type Error = DecodeError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(ContentKind::Image),
            1 => Ok(ContentKind::Font),
            2 => Ok(ContentKind::Sound),
            other => Err(DecodeError::UnknownContentKind(other)),
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A server-pushed asset, still encoded (PNG, TTF, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPush {
    pub kind: ContentKind,
    pub id: u32,
    pub data: Bytes,
}

impl ContentPush {
    /// Append the wire form of this push.
    pub fn encode(&self, dst: &mut BytesMut) -> std::result::Result<(), EncodeError> {
        dst.reserve(CONTENT_HEADER_SIZE + self.data.len());
        dst.put_u8(self.kind.code());
        dst.put_u32_le(self.id);
        put_len(dst, "asset length", self.data.len())?;
        dst.put_slice(&self.data);
        Ok(())
    }
}

/// Decode a CONTENT channel message. Bytes after the asset are ignored.
pub fn decode_content(payload: &Bytes) -> Result<ContentPush> {
    let mut cursor = WireCursor::new(payload);
    let kind = ContentKind::try_from(cursor.read_u8()?)?;
    let id = cursor.read_u32()?;
    let len = cursor.read_u32()? as usize;
    let data = cursor.read_bytes(len)?;
    Ok(ContentPush { kind, id, data })
}
