use std::time::Duration;

use anomaly_frame::FrameError;
use anomaly_protocol::DecodeError;
use anomaly_transport::TransportError;

/// Errors that can occur in client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The client could not be set up.
    #[error("client initialization failed: {0}")]
    Init(String),

    /// The server hostname did not resolve.
    #[error("could not resolve hostname '{host}'")]
    Resolve {
        host: String,
        #[source]
        source: TransportError,
    },

    /// The server did not accept the connection in time.
    #[error("could not connect to '{host}:[{port}]': timed out after {timeout:?}")]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },

    /// The connection attempt failed.
    #[error("could not connect to '{host}:[{port}]'")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: TransportError,
    },

    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// A message payload did not match its layout.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl ClientError {
    /// Map a failed connection attempt to the error the user sees.
    pub(crate) fn from_connect(host: &str, port: u16, err: TransportError) -> Self {
        match err {
            TransportError::Resolve { .. } | TransportError::NoAddress { .. } => {
                ClientError::Resolve {
                    host: host.to_string(),
                    source: err,
                }
            }
            TransportError::ConnectTimeout { timeout, .. } => ClientError::ConnectTimeout {
                host: host.to_string(),
                port,
                timeout,
            },
            other => ClientError::Connect {
                host: host.to_string(),
                port,
                source: other,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
