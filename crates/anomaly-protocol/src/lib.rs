//! Message layouts for the anomaly presentation protocol.
//!
//! Each server-to-client channel carries exactly one message kind:
//!
//! | channel | message | decoder |
//! |---------|---------|---------|
//! | SPRITE  | draw list | [`decode_scene`] |
//! | COMMAND | UI directives | [`decode_commands`] |
//! | CONTENT | asset push | [`decode_content`] |
//! | AUDIO   | audio commands | [`decode_audio`] |
//!
//! All scalars are little-endian, floats are IEEE-754. Decoders are pure:
//! they never touch a collaborator and never read past the payload. Text
//! and asset bytes are zero-copy slices of the message.

pub mod audio;
pub mod command;
pub mod content;
pub mod error;
pub mod login;
pub mod scene;
pub mod wire;

pub use audio::{decode_audio, encode_audio, AudioCommand, AudioCommandKind, AUDIO_RECORD_SIZE};
pub use command::{decode_commands, encode_commands, Command};
pub use content::{decode_content, ContentKind, ContentPush, CONTENT_HEADER_SIZE};
pub use error::{DecodeError, EncodeError, Result};
pub use login::Platform;
pub use scene::{
    decode_scene, encode_scene, DrawRecord, Rgb, SpriteDraw, TextDraw, DRAW_PREFIX_SIZE,
    TEXT_FLAG,
};
pub use wire::WireCursor;
