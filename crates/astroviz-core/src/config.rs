// ── Runtime engine configuration ──
//
// Describes where the daemon lives and how the engine paces itself.
// Never touches disk; astroviz-config builds one from files and env.

use std::time::Duration;

use astroviz_api::TransportConfig;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

pub const DEFAULT_WS_URL: &str = "ws://localhost:8000/ws/orbits";
pub const DEFAULT_HTTP_URL: &str = "http://localhost:8000";

/// What the store does with an update whose epoch is older than the
/// current snapshot's.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StaleUpdatePolicy {
    /// Reconcile anyway; the epoch moves backwards.
    #[default]
    Apply,
    /// Drop the update and keep the current snapshot.
    Discard,
}

/// Configuration for one engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Push stream endpoint.
    pub ws_url: Url,
    /// Daemon HTTP base; the poller appends `/api/orbits/snapshot`.
    pub http_url: Url,
    /// Fixed delay between a drop and the next connect attempt.
    pub reconnect_delay: Duration,
    /// Poll interval while the stream is offline.
    pub poll_interval: Duration,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub stale_updates: StaleUpdatePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ws_url: DEFAULT_WS_URL.parse().expect("default ws url is valid"),
            http_url: DEFAULT_HTTP_URL.parse().expect("default http url is valid"),
            reconnect_delay: Duration::from_secs(5),
            poll_interval: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            stale_updates: StaleUpdatePolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
        }
    }
}
