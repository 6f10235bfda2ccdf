// ── Stream state store ──
//
// Sole owner of the authoritative snapshot. Every write replaces the
// whole `StreamState` inside one `send_if_modified` call, so readers
// never observe a half-applied install and concurrent writers serialize.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use super::state::{ConnectionStatus, SnapshotOrigin, StateView, StreamState};
use crate::config::StaleUpdatePolicy;
use crate::error::CoreError;
use crate::model::{PartialUpdate, Snapshot};
use crate::pipeline::{normalize, reconcile};

/// Result of an install attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    Discarded(DiscardReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The store was closed by teardown.
    Closed,
    /// Update epoch older than the current one under `StaleUpdatePolicy::Discard`.
    Stale,
    /// Poll result that landed after the push stream left offline.
    Superseded,
}

pub struct StreamStore {
    state: watch::Sender<StreamState>,
    stale_updates: StaleUpdatePolicy,
}

impl StreamStore {
    /// Create a store holding `placeholder` (normalized) until real data arrives.
    pub fn new(placeholder: Snapshot, stale_updates: StaleUpdatePolicy) -> Self {
        let (state, _) = watch::channel(StreamState::new(normalize(&placeholder)));
        Self {
            state,
            stale_updates,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn state(&self) -> StreamState {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> StateView {
        self.state.borrow().view()
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.state.borrow().snapshot)
    }

    /// Raw status, without the effective-status mapping.
    pub fn status(&self) -> ConnectionStatus {
        self.state.borrow().status
    }

    pub fn subscribe(&self) -> watch::Receiver<StreamState> {
        self.state.subscribe()
    }

    /// Change notifications as a `Stream`, starting with the current value.
    pub fn stream(&self) -> WatchStream<StreamState> {
        WatchStream::new(self.state.subscribe())
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    pub fn stale_updates(&self) -> StaleUpdatePolicy {
        self.stale_updates
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Refuse all further writes.
    pub(crate) fn close(&self) {
        self.state.send_if_modified(|s| {
            if s.closed {
                return false;
            }
            s.closed = true;
            true
        });
    }

    pub(crate) fn set_status(&self, status: ConnectionStatus) {
        self.state.send_if_modified(|s| {
            if s.closed || s.status == status {
                return false;
            }
            s.status = status;
            true
        });
    }

    /// Channel opened: status live, last error cleared.
    pub(crate) fn go_live(&self) {
        self.state.send_if_modified(|s| {
            if s.closed {
                return false;
            }
            let changed = s.status != ConnectionStatus::Live || s.error.is_some();
            s.status = ConnectionStatus::Live;
            s.error = None;
            changed
        });
    }

    /// Channel dropped. `error` replaces the last error only when present.
    pub(crate) fn go_offline(&self, error: Option<String>) {
        self.state.send_if_modified(|s| {
            if s.closed {
                return false;
            }
            let mut changed = s.status != ConnectionStatus::Offline;
            s.status = ConnectionStatus::Offline;
            if let Some(error) = error {
                changed |= s.error.as_deref() != Some(error.as_str());
                s.error = Some(error);
            }
            changed
        });
    }

    /// Record a failure without touching status.
    pub(crate) fn record_error(&self, error: String) {
        self.state.send_if_modified(|s| {
            if s.closed || s.error.as_deref() == Some(error.as_str()) {
                return false;
            }
            s.error = Some(error);
            true
        });
    }

    /// Normalize and install a full snapshot, replacing the current one.
    pub(crate) fn install_snapshot(
        &self,
        snapshot: &Snapshot,
        origin: SnapshotOrigin,
    ) -> InstallOutcome {
        self.install(snapshot, origin, false)
    }

    /// Install a polled snapshot only if the raw status is still offline.
    /// The check and the install happen under the same write.
    pub(crate) fn install_polled(&self, snapshot: &Snapshot) -> InstallOutcome {
        self.install(snapshot, SnapshotOrigin::Poll, true)
    }

    fn install(
        &self,
        snapshot: &Snapshot,
        origin: SnapshotOrigin,
        only_offline: bool,
    ) -> InstallOutcome {
        let mut outcome = InstallOutcome::Discarded(DiscardReason::Closed);
        self.state.send_if_modified(|s| {
            if s.closed {
                return false;
            }
            if only_offline && s.status != ConnectionStatus::Offline {
                outcome = InstallOutcome::Discarded(DiscardReason::Superseded);
                return false;
            }
            let next = normalize(snapshot);
            debug!(
                %origin,
                epoch = %next.epoch,
                objects = next.objects.len(),
                approaches = next.close_approaches.len(),
                "installing snapshot"
            );
            s.snapshot = Arc::new(next);
            s.origin = origin;
            s.revision += 1;
            outcome = InstallOutcome::Installed;
            true
        });
        outcome
    }

    /// Reconcile `update` against the current snapshot and install the result.
    ///
    /// A reconcile failure leaves the current state in place and is returned.
    pub(crate) fn apply_update(
        &self,
        update: &PartialUpdate,
    ) -> Result<InstallOutcome, CoreError> {
        let policy = self.stale_updates;
        let mut result = Ok(InstallOutcome::Discarded(DiscardReason::Closed));
        self.state.send_if_modified(|s| {
            if s.closed {
                return false;
            }
            if policy == StaleUpdatePolicy::Discard && update.epoch < s.snapshot.epoch {
                debug!(
                    current = %s.snapshot.epoch,
                    update = %update.epoch,
                    "discarding stale update"
                );
                result = Ok(InstallOutcome::Discarded(DiscardReason::Stale));
                return false;
            }
            let next = match reconcile(&s.snapshot, update) {
                Ok(next) => next,
                Err(e) => {
                    result = Err(e);
                    return false;
                }
            };
            debug!(
                epoch = %next.epoch,
                patches = update.objects.len(),
                "applied update"
            );
            s.snapshot = Arc::new(next);
            s.origin = SnapshotOrigin::Push;
            s.revision += 1;
            result = Ok(InstallOutcome::Installed);
            true
        });
        result
    }
}
