//! Connection-oriented stream transport for the anomaly client.
//!
//! This is the lowest layer: hostname resolution, bounded-time connect, and
//! the [`NetStream`] byte stream everything else builds on. Reliability and
//! ordering come from TCP; channel multiplexing lives one layer up in
//! `anomaly-frame`.

pub mod error;
pub mod stream;
pub mod tcp;

pub use error::{Result, TransportError};
pub use stream::NetStream;
pub use tcp::{connect, resolve, NetListener, DEFAULT_CONNECT_TIMEOUT};
