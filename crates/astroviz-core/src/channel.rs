// ── Push channel manager ──
//
// Owns the push connection lifecycle: connect, subscribe, read frames
// into the store, and on any drop go offline and retry after a fixed
// delay. Cancelling the token ends the loop from any state, closing the
// open session or abandoning a pending connect.

use std::sync::Arc;
use std::time::Duration;

use astroviz_api::{PushConnector, PushSession, StreamMessage, SubscribeRequest};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::model::{PartialUpdate, Snapshot};
use crate::store::{ConnectionStatus, DiscardReason, InstallOutcome, SnapshotOrigin, StreamStore};

/// Upper bound on the close handshake during teardown.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// What happened to one inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    Installed,
    Discarded(DiscardReason),
    /// Valid envelope of a kind this engine does not consume.
    Ignored,
    /// Undecodable or failed validation; dropped.
    Malformed,
}

impl From<InstallOutcome> for MessageOutcome {
    fn from(outcome: InstallOutcome) -> Self {
        match outcome {
            InstallOutcome::Installed => Self::Installed,
            InstallOutcome::Discarded(reason) => Self::Discarded(reason),
        }
    }
}

/// Decode one text frame and feed it through the store.
///
/// Malformed frames are logged and dropped; they never touch status or data.
pub fn apply_message(store: &StreamStore, text: &str) -> MessageOutcome {
    let message = match StreamMessage::parse(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "dropping malformed stream message");
            return MessageOutcome::Malformed;
        }
    };

    match message {
        StreamMessage::Snapshot { snapshot } => match Snapshot::try_from(snapshot) {
            Ok(snapshot) => store
                .install_snapshot(&snapshot, SnapshotOrigin::Push)
                .into(),
            Err(e) => {
                warn!(error = %e, "dropping invalid snapshot");
                MessageOutcome::Malformed
            }
        },
        StreamMessage::Update { update } => match PartialUpdate::try_from(update) {
            Ok(update) => match store.apply_update(&update) {
                Ok(outcome) => outcome.into(),
                Err(e) => {
                    warn!(error = %e, "dropping update that cannot be applied");
                    MessageOutcome::Malformed
                }
            },
            Err(e) => {
                warn!(error = %e, "dropping invalid update");
                MessageOutcome::Malformed
            }
        },
        StreamMessage::Other => {
            trace!("ignoring stream message of unhandled kind");
            MessageOutcome::Ignored
        }
    }
}

/// Drives one push connector against one store.
pub struct ChannelManager<C> {
    connector: C,
    store: Arc<StreamStore>,
    reconnect_delay: Duration,
}

impl<C: PushConnector> ChannelManager<C> {
    pub fn new(connector: C, store: Arc<StreamStore>, reconnect_delay: Duration) -> Self {
        Self {
            connector,
            store,
            reconnect_delay,
        }
    }

    /// Run until `cancel` fires. Never returns early on transport errors.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            self.store.set_status(ConnectionStatus::Connecting);

            let result = self.run_session(&cancel).await;
            if cancel.is_cancelled() {
                break;
            }

            match result {
                Ok(()) => {
                    info!("push stream closed");
                    self.store.go_offline(None);
                }
                Err(e) => {
                    warn!(error = %e, transient = e.is_transient(), "push stream error");
                    self.store.go_offline(Some(e.to_string()));
                }
            }

            debug!(
                delay_ms = u64::try_from(self.reconnect_delay.as_millis()).unwrap_or(u64::MAX),
                "waiting before reconnect"
            );
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }

        debug!("channel manager exiting");
    }

    /// One connection from connect to drop. `Ok(())` is a clean close or
    /// a cancellation.
    async fn run_session(&self, cancel: &CancellationToken) -> Result<(), astroviz_api::Error> {
        let mut session = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(()),
            session = self.connector.connect() => session?,
        };

        self.store.go_live();
        info!("push stream live");

        let hello = match SubscribeRequest::ORBITS.to_json() {
            Ok(hello) => hello,
            Err(e) => {
                close_session(&mut session).await;
                return Err(e);
            }
        };
        if let Err(e) = session.send_text(hello).await {
            close_session(&mut session).await;
            return Err(e);
        }

        loop {
            let frame = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    close_session(&mut session).await;
                    return Ok(());
                }
                frame = session.next_text() => frame,
            };

            match frame {
                Some(Ok(text)) => {
                    apply_message(&self.store, &text);
                }
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            }
        }
    }
}

async fn close_session<S: PushSession>(session: &mut S) {
    if tokio::time::timeout(CLOSE_GRACE, session.close())
        .await
        .is_err()
    {
        debug!("close handshake timed out");
    }
}
