// Shared transport configuration for building reqwest::Client instances
// and bounding WebSocket connect attempts.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("astroviz/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for the snapshot client and push channel.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound on a single snapshot request.
    pub request_timeout: Duration,
    /// Upper bound on a WebSocket connect + upgrade.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts() {
        let config = TransportConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn builds_client() {
        assert!(TransportConfig::default().build_client().is_ok());
    }
}
