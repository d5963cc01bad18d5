//! COMMAND channel: `u32 count` followed by `count` one-byte codes.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{EncodeError, Result};
use crate::wire::{put_len, WireCursor};

/// A UI control directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin text composition (show the on-screen keyboard on mobile).
    StartTextInput,
    /// End text composition and discard composed text.
    StopTextInput,
    /// A code this client does not know; skipped by the dispatcher.
    Unknown(u8),
}

impl Command {
    pub fn code(self) -> u8 {
        match self {
            Command::StartTextInput => 0,
            Command::StopTextInput => 1,
            Command::Unknown(code) => code,
        }
    }
}

impl From<u8> for Command {
    fn from(code: u8) -> Self {
        match code {
            0 => Command::StartTextInput,
            1 => Command::StopTextInput,
            other => Command::Unknown(other),
        }
    }
}

/// Decode a COMMAND channel message.
pub fn decode_commands(payload: &Bytes) -> Result<Vec<Command>> {
    let mut cursor = WireCursor::new(payload);
    let count = cursor.read_count(1)?;
    let codes = cursor.read_bytes(count)?;
    Ok(codes.iter().copied().map(Command::from).collect())
}

/// Encode commands as a COMMAND channel message.
pub fn encode_commands(
    commands: &[Command],
    dst: &mut BytesMut,
) -> std::result::Result<(), EncodeError> {
    put_len(dst, "command count", commands.len())?;
    for command in commands {
        dst.put_u8(command.code());
    }
    Ok(())
}
