//! Client core for the anomaly presentation protocol.
//!
//! A server streams draw lists, text-input commands, sound commands and
//! asset pushes over one connection; the client decodes them and drives a
//! renderer, window and audio backend supplied by the host application.
//!
//! # Crate Structure
//!
//! - [`transport`]: TCP connection, hostname resolution, bounded connect
//! - [`frame`]: channel-tagged, length-prefixed message framing
//! - [`protocol`]: message layouts and their decoders
//! - [`client`]: session, tick loop and collaborator traits
//!
//! ```no_run
//! use anomaly::{Client, ClientConfig, Renderer, Audio};
//!
//! fn run<R: Renderer, A: Audio>(renderer: &mut R, audio: &mut A) -> anomaly::client::Result<()> {
//!     let mut client = Client::new(ClientConfig::default())?;
//!     if !client.connect(renderer.window(), "localhost", 17899) {
//!         return Ok(());
//!     }
//!     while client.tick(renderer, audio)? {
//!         // present, poll window events, sleep until next frame
//!     }
//!     Ok(())
//! }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use anomaly_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use anomaly_frame::*;
}

/// Re-export message types and decoders.
pub mod protocol {
    pub use anomaly_protocol::*;
}

/// Re-export client types.
pub mod client {
    pub use anomaly_client::*;
}

pub use anomaly_client::{
    Audio, Channel, Client, ClientConfig, ClientError, NetEvent, Platform, Renderer, Window,
};
