// ── Reactive stream state store ──
//
// One authoritative snapshot plus connectivity, published through a
// `watch` channel. Only the channel manager and poller write to it.

mod state;
mod stream_store;

pub use state::{ConnectionStatus, SnapshotOrigin, StateView, StreamState};
pub use stream_store::{DiscardReason, InstallOutcome, StreamStore};
