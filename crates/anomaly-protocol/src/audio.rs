//! AUDIO channel: `u32 count` followed by fixed 8-byte records.
//!
//! ```text
//! u32 sound_id | u16 channel | u8 volume | u8 type
//! ```
//!
//! The set of command types belongs to the audio engine. The known codes
//! are named; anything else is passed through untouched.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{EncodeError, Result};
use crate::wire::{put_len, WireCursor};

/// Wire size of one audio record.
pub const AUDIO_RECORD_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommandKind {
    Play,
    Stop,
    SetVolume,
    Other(u8),
}

impl AudioCommandKind {
    pub fn code(self) -> u8 {
        match self {
            AudioCommandKind::Play => 0,
            AudioCommandKind::Stop => 1,
            AudioCommandKind::SetVolume => 2,
            AudioCommandKind::Other(code) => code,
        }
    }
}

impl From<u8> for AudioCommandKind {
    fn from(code: u8) -> Self {
        match code {
            0 => AudioCommandKind::Play,
            1 => AudioCommandKind::Stop,
            2 => AudioCommandKind::SetVolume,
            other => AudioCommandKind::Other(other),
        }
    }
}

impl fmt::Display for AudioCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioCommandKind::Play => f.write_str("play"),
            AudioCommandKind::Stop => f.write_str("stop"),
            AudioCommandKind::SetVolume => f.write_str("set_volume"),
            AudioCommandKind::Other(code) => write!(f, "other({code})"),
        }
    }
}

/// One audio command for a mixer channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioCommand {
    pub sound_id: u32,
    pub channel: u16,
    pub volume: u8,
    pub kind: AudioCommandKind,
}

impl AudioCommand {
    /// Append the 8-byte wire form of this command.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.sound_id);
        dst.put_u16_le(self.channel);
        dst.put_u8(self.volume);
        dst.put_u8(self.kind.code());
    }
}

/// Decode an AUDIO channel message. Order is preserved.
pub fn decode_audio(payload: &Bytes) -> Result<Vec<AudioCommand>> {
    let mut cursor = WireCursor::new(payload);
    let count = cursor.read_count(AUDIO_RECORD_SIZE)?;
    let mut commands = Vec::with_capacity(count);
    for _ in 0..count {
        commands.push(AudioCommand {
            sound_id: cursor.read_u32()?,
            channel: cursor.read_u16()?,
            volume: cursor.read_u8()?,
            kind: AudioCommandKind::from(cursor.read_u8()?),
        });
    }
    Ok(commands)
}

/// Encode commands as an AUDIO channel message.
pub fn encode_audio(
    commands: &[AudioCommand],
    dst: &mut BytesMut,
) -> std::result::Result<(), EncodeError> {
    put_len(dst, "command count", commands.len())?;
    for command in commands {
        command.encode(dst);
    }
    Ok(())
}
