//! The fixed channel set.
//!
//! Ordinals are part of the wire contract and must match the server.

use std::fmt;

use crate::error::FrameError;

/// A logical sub-stream of the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    /// Client to server: login record and input snapshots.
    Input = 0,
    /// Server to client: draw lists.
    Sprite = 1,
    /// Server to client: UI control directives.
    Command = 2,
    /// Server to client: asset pushes.
    Content = 3,
    /// Server to client: audio commands.
    Audio = 4,
}

impl Channel {
    /// Number of channels the connection carries.
    pub const COUNT: usize = 5;

    /// Every channel, in ordinal order.
    pub const ALL: [Channel; Self::COUNT] = [
        Channel::Input,
        Channel::Sprite,
        Channel::Command,
        Channel::Content,
        Channel::Audio,
    ];

    /// Wire id of the channel.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Human-readable channel name.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Input => "INPUT",
            Channel::Sprite => "SPRITE",
            Channel::Command => "COMMAND",
            Channel::Content => "CONTENT",
            Channel::Audio => "AUDIO",
        }
    }
}

impl TryFrom<u8> for Channel {
    type Error = FrameError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Channel::Input),
            1 => Ok(Channel::Sprite),
            2 => Ok(Channel::Command),
            3 => Ok(Channel::Content),
            4 => Ok(Channel::Audio),
            other => Err(FrameError::UnknownChannel(other)),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
