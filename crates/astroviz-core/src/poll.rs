// ── Poll fallback ──
//
// While the push stream is offline, fetch full snapshots on a fixed
// interval. Watches the store for status changes: polling starts on entry
// to offline and stops as soon as the status moves on.

use std::sync::Arc;
use std::time::Duration;

use astroviz_api::SnapshotSource;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::model::Snapshot;
use crate::store::{ConnectionStatus, DiscardReason, InstallOutcome, StreamStore};

pub struct PollFallback<S> {
    source: S,
    store: Arc<StreamStore>,
    interval: Duration,
}

impl<S: SnapshotSource> PollFallback<S> {
    pub fn new(source: S, store: Arc<StreamStore>, interval: Duration) -> Self {
        Self {
            source,
            store,
            interval,
        }
    }

    /// Run until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        let mut state_rx = self.store.subscribe();
        let mut last_poll: Option<Instant> = None;

        loop {
            let offline = state_rx.borrow_and_update().status == ConnectionStatus::Offline;

            if !offline {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    changed = state_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        continue;
                    }
                }
            }

            // A poll less than one interval ago still counts for a new
            // offline period.
            let due = last_poll.map_or_else(Instant::now, |at| at + self.interval);
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                changed = state_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                () = tokio::time::sleep_until(due) => {}
            }

            last_poll = Some(Instant::now());
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = self.poll_once() => {}
            }
        }

        debug!("poll fallback exiting");
    }

    async fn poll_once(&self) {
        debug!("polling snapshot while offline");
        let wire = match self.source.fetch_snapshot().await {
            Ok(wire) => wire,
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "snapshot poll failed");
                self.store.record_error(e.to_string());
                return;
            }
        };

        let snapshot = match Snapshot::try_from(wire) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "snapshot poll returned invalid data");
                self.store.record_error(e.to_string());
                return;
            }
        };

        if self.store.install_polled(&snapshot)
            == InstallOutcome::Discarded(DiscardReason::Superseded)
        {
            debug!("stream left offline during poll, dropping result");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::StaleUpdatePolicy;
    use crate::model::test_support::{at, satellite, snapshot};
    use crate::store::SnapshotOrigin;
    use crate::testing::{FakeSource, advance_secs, settle, wire_snapshot};

    fn store() -> Arc<StreamStore> {
        Arc::new(StreamStore::new(
            snapshot(vec![satellite("1")], Vec::new()),
            StaleUpdatePolicy::Apply,
        ))
    }

    fn spawn(
        source: &FakeSource,
        store: &Arc<StreamStore>,
    ) -> (CancellationToken, tokio::task::JoinHandle<()>) {
        let cancel = CancellationToken::new();
        let poller = PollFallback::new(source.clone(), Arc::clone(store), Duration::from_secs(60));
        let handle = tokio::spawn(poller.run(cancel.clone()));
        (cancel, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn idle_while_not_offline() {
        let source = FakeSource::default();
        let store = store();
        let (cancel, handle) = spawn(&source, &store);
        settle().await;

        store.set_status(ConnectionStatus::Live);
        advance_secs(300.0).await;
        assert_eq!(source.calls(), 0);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn offline_polls_immediately_and_installs() {
        let source = FakeSource::default();
        source.respond(wire_snapshot(90, &["7", "8", "9"]));
        let store = store();
        let (cancel, handle) = spawn(&source, &store);
        settle().await;

        store.go_offline(Some("connection refused".into()));
        settle().await;

        assert_eq!(source.calls(), 1);
        let state = store.state();
        assert_eq!(state.origin, SnapshotOrigin::Poll);
        assert_eq!(state.snapshot.epoch, at(90));
        assert_eq!(state.snapshot.stats.tracked, 3);
        assert_eq!(state.status, ConnectionStatus::Offline);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn failure_records_error_and_retries_on_interval() {
        let source = FakeSource::default();
        source.respond_status(503);
        let store = store();
        store.go_offline(None);
        let (cancel, handle) = spawn(&source, &store);
        settle().await;

        assert_eq!(source.calls(), 1);
        let state = store.state();
        assert_eq!(state.error.as_deref(), Some("Request failed: 503"));
        assert_eq!(state.status, ConnectionStatus::Offline);
        assert_eq!(state.origin, SnapshotOrigin::Placeholder);

        advance_secs(59.9).await;
        assert_eq!(source.calls(), 1);
        advance_secs(0.2).await;
        assert_eq!(source.calls(), 2);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_status_leaves_offline() {
        let source = FakeSource::default();
        let store = store();
        store.go_offline(None);
        let (cancel, handle) = spawn(&source, &store);
        settle().await;
        assert_eq!(source.calls(), 1);

        store.set_status(ConnectionStatus::Connecting);
        settle().await;
        advance_secs(180.0).await;
        assert_eq!(source.calls(), 1);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn result_dropped_when_stream_returns_mid_fetch() {
        let source = FakeSource::default();
        source.set_latency(Duration::from_secs(5));
        source.respond(wire_snapshot(90, &["7", "8", "9"]));
        let store = store();
        store.go_offline(None);
        let (cancel, handle) = spawn(&source, &store);
        settle().await;
        assert_eq!(source.calls(), 1);

        // Push stream comes back and delivers data while the poll is in flight.
        store.go_live();
        let pushed = snapshot(vec![satellite("p")], Vec::new());
        store.install_snapshot(&pushed, SnapshotOrigin::Push);
        advance_secs(5.0).await;

        let state = store.state();
        assert_eq!(state.origin, SnapshotOrigin::Push);
        assert_eq!(state.snapshot.objects[0].id.as_str(), "p");
        assert_eq!(state.revision, 1);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn new_offline_period_respects_previous_poll() {
        let source = FakeSource::default();
        let store = store();
        store.go_offline(None);
        let (cancel, handle) = spawn(&source, &store);
        settle().await;
        assert_eq!(source.calls(), 1);

        advance_secs(10.0).await;
        store.set_status(ConnectionStatus::Connecting);
        settle().await;
        advance_secs(10.0).await;
        store.go_offline(None);
        settle().await;
        assert_eq!(source.calls(), 1);

        advance_secs(40.0).await;
        assert_eq!(source.calls(), 2);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_polling() {
        let source = FakeSource::default();
        let store = store();
        store.go_offline(None);
        let (cancel, handle) = spawn(&source, &store);
        settle().await;

        cancel.cancel();
        handle.await.unwrap();
        advance_secs(600.0).await;
        assert_eq!(source.calls(), 1);
    }
}
