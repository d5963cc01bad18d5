use std::time::Duration;

use anomaly_frame::{FrameConfig, DEFAULT_MAX_BACKLOG, DEFAULT_MAX_PAYLOAD};
use anomaly_protocol::Platform;
use anomaly_transport::DEFAULT_CONNECT_TIMEOUT;

/// Client behavior, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Profile announced in the login record.
    pub platform: Platform,
    /// Upper bound on the blocking wait inside `connect`.
    pub connect_timeout: Duration,
    /// End the session when nothing arrives for this long. `None` waits
    /// forever.
    pub peer_timeout: Option<Duration>,
    /// Largest inbound or outbound message accepted, in bytes.
    pub max_payload_size: usize,
    /// Unsent outbound bytes tolerated before the server is treated as
    /// gone.
    pub max_send_backlog: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            platform: Platform::detect(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            peer_timeout: None,
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            max_send_backlog: DEFAULT_MAX_BACKLOG,
        }
    }
}

impl ClientConfig {
    /// Check the values a session cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.connect_timeout.is_zero() {
            return Err("connect timeout must be greater than zero".to_string());
        }
        if self.peer_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err("peer timeout must be greater than zero".to_string());
        }
        if self.max_payload_size == 0 {
            return Err("max payload size must be greater than zero".to_string());
        }
        if self.max_send_backlog == 0 {
            return Err("max send backlog must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Frame settings for a non-blocking session stream.
    pub(crate) fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            max_payload_size: self.max_payload_size,
            max_backlog: self.max_send_backlog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = ClientConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_millis(5000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_values() {
        let config = ClientConfig {
            connect_timeout: Duration::ZERO,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            peer_timeout: Some(Duration::ZERO),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            max_payload_size: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            max_send_backlog: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
