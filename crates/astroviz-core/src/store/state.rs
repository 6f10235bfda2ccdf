// ── Published store state ──

use std::sync::Arc;

use serde::Serialize;
use strum::Display;

use crate::model::Snapshot;

/// Push channel connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionStatus {
    Connecting,
    Live,
    Offline,
}

/// Where the current snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SnapshotOrigin {
    /// The dataset the engine was created with; nothing received yet.
    Placeholder,
    /// Push stream (full snapshot or reconciled update).
    Push,
    /// HTTP poll while offline.
    Poll,
}

/// Everything the store holds, replaced as one value on every write.
#[derive(Debug, Clone)]
pub struct StreamState {
    pub snapshot: Arc<Snapshot>,
    /// Raw channel status as set by the channel manager.
    pub status: ConnectionStatus,
    pub error: Option<String>,
    pub origin: SnapshotOrigin,
    /// Bumped on every installed snapshot.
    pub revision: u64,
    /// Set once at teardown; no further installs are accepted.
    pub closed: bool,
}

impl StreamState {
    pub(crate) fn new(placeholder: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(placeholder),
            status: ConnectionStatus::Connecting,
            error: None,
            origin: SnapshotOrigin::Placeholder,
            revision: 0,
            closed: false,
        }
    }

    /// Status as consumers should see it: a reconnect attempt after real
    /// data has arrived still reads as live.
    pub fn effective_status(&self) -> ConnectionStatus {
        match (self.status, self.origin) {
            (ConnectionStatus::Connecting, SnapshotOrigin::Push | SnapshotOrigin::Poll) => {
                ConnectionStatus::Live
            }
            (status, _) => status,
        }
    }

    pub fn view(&self) -> StateView {
        StateView {
            snapshot: Arc::clone(&self.snapshot),
            status: self.effective_status(),
            error: self.error.clone(),
        }
    }
}

/// Consumer-facing read of the store.
#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    pub snapshot: Arc<Snapshot>,
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
