//! SPRITE channel: one message is one complete frame's draw list.
//!
//! ```text
//! u32 count
//! count × record:
//!   u32 id            bit 31 set => text record
//!   f32 x, f32 y, f32 scale
//!   text only: u8 r, u8 g, u8 b, u32 len, len × u8 (UTF-8)
//! ```

use std::borrow::Cow;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{EncodeError, Result};
use crate::wire::{put_len, WireCursor};

/// Bit of the record id that marks a text record.
pub const TEXT_FLAG: u32 = 0x8000_0000;

/// Size of the `id, x, y, scale` prefix every record starts with.
pub const DRAW_PREFIX_SIZE: usize = 16;

/// Draw a sprite by image id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Draw a run of text with a font.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    /// Font id with the text flag already stripped.
    pub font_id: u32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub color: Rgb,
    /// Raw UTF-8 as sent; not validated.
    pub text: Bytes,
}

impl TextDraw {
    /// The text, with invalid sequences replaced.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }
}

/// One decoded draw instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawRecord {
    Sprite(SpriteDraw),
    Text(TextDraw),
}

impl DrawRecord {
    /// Append the wire form of this record.
    ///
    /// A text record's font id loses bit 31, which is the text flag.
    pub fn encode(&self, dst: &mut BytesMut) -> std::result::Result<(), EncodeError> {
        match self {
            DrawRecord::Sprite(sprite) => {
                dst.put_u32_le(sprite.id & !TEXT_FLAG);
                dst.put_f32_le(sprite.x);
                dst.put_f32_le(sprite.y);
                dst.put_f32_le(sprite.scale);
            }
            DrawRecord::Text(text) => {
                dst.put_u32_le(text.font_id | TEXT_FLAG);
                dst.put_f32_le(text.x);
                dst.put_f32_le(text.y);
                dst.put_f32_le(text.scale);
                dst.put_u8(text.color.r);
                dst.put_u8(text.color.g);
                dst.put_u8(text.color.b);
                put_len(dst, "text length", text.text.len())?;
                dst.put_slice(&text.text);
            }
        }
        Ok(())
    }
}

/// Decode a SPRITE channel message into its draw list.
///
/// The whole list is decoded before anything is returned, so a malformed
/// message never yields a partial frame.
pub fn decode_scene(payload: &Bytes) -> Result<Vec<DrawRecord>> {
    let mut cursor = WireCursor::new(payload);
    let count = cursor.read_count(DRAW_PREFIX_SIZE)?;
    let mut records = Vec::with_capacity(count);

    for _ in 0..count {
        let id = cursor.read_u32()?;
        let x = cursor.read_f32()?;
        let y = cursor.read_f32()?;
        let scale = cursor.read_f32()?;

        if id & TEXT_FLAG == 0 {
            records.push(DrawRecord::Sprite(SpriteDraw { id, x, y, scale }));
            continue;
        }

        let color = Rgb {
            r: cursor.read_u8()?,
            g: cursor.read_u8()?,
            b: cursor.read_u8()?,
        };
        let len = cursor.read_u32()? as usize;
        let text = cursor.read_bytes(len)?;
        records.push(DrawRecord::Text(TextDraw {
            font_id: id & !TEXT_FLAG,
            x,
            y,
            scale,
            color,
            text,
        }));
    }

    Ok(records)
}

/// Encode a draw list as a SPRITE channel message.
///
/// On error `dst` may hold part of the message.
pub fn encode_scene(
    records: &[DrawRecord],
    dst: &mut BytesMut,
) -> std::result::Result<(), EncodeError> {
    put_len(dst, "record count", records.len())?;
    for record in records {
        record.encode(dst)?;
    }
    Ok(())
}
