//! Live sync channel configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Live sync configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LiveSyncConfig {
    /// Push channel endpoint every view connects to
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Connection establishment timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
}

impl LiveSyncConfig {
    /// Get connect timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Validate live sync configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.endpoint.is_empty() {
            return Err(ValidationError::MissingRequired("LIVE_SYNC__ENDPOINT"));
        }
        let known_scheme = ["ws://", "wss://", "http://", "https://", "memory://"]
            .iter()
            .any(|scheme| self.endpoint.starts_with(scheme));
        if !known_scheme {
            return Err(ValidationError::InvalidChannelEndpoint);
        }
        if self.connect_timeout_ms == 0 || self.connect_timeout_ms > 60_000 {
            return Err(ValidationError::InvalidConnectTimeout);
        }
        Ok(())
    }
}

impl Default for LiveSyncConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_ms: default_connect_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "ws://localhost:3001".to_string()
}

fn default_connect_timeout() -> u64 {
    5_000
}
