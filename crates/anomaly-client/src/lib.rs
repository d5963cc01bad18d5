//! Session management and channel dispatch for the anomaly client.
//!
//! A [`Client`] owns one connection to a presentation server. Once per
//! frame the host loop calls [`Client::tick`], which sends the pending input
//! snapshot, drains every queued inbound message without blocking, and
//! drives the renderer, window and audio collaborators from them.

pub mod client;
pub mod collaborator;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod session;

#[cfg(test)]
pub(crate) mod mock;

pub use anomaly_frame::{Channel, Frame};
pub use anomaly_protocol::{
    AudioCommand, AudioCommandKind, Command, ContentKind, ContentPush, DrawRecord, Platform, Rgb,
    SpriteDraw, TextDraw,
};
pub use client::{Client, SessionStats};
pub use collaborator::{Audio, Renderer, Window};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use session::{NetEvent, TcpSession, Transport};
