//! Length-prefixed message framing with channel multiplexing.
//!
//! One connection carries five logical channels. Every message is framed
//! with:
//! - A 2-byte magic number ("AN") for stream synchronization
//! - A 4-byte little-endian payload length
//! - A 1-byte channel id
//!
//! Delivery is reliable and ordered per connection, hence per channel.

pub mod channel;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use channel::Channel;
pub use codec::{
    decode_frame, encode_frame, Frame, FrameConfig, DEFAULT_MAX_BACKLOG, DEFAULT_MAX_PAYLOAD,
    HEADER_SIZE,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
