//! Transport seams between the sync engine and the outside world.
//!
//! The engine is generic over these traits so the connect/receive/reconnect
//! loop and the poll fallback can be driven by in-memory fakes in tests and
//! by [`WebSocketConnector`](crate::WebSocketConnector) /
//! [`SnapshotClient`](crate::SnapshotClient) in production.

use std::future::Future;

use crate::error::Error;
use crate::wire::WireSnapshot;

/// Opens push-channel sessions.
pub trait PushConnector: Send + Sync + 'static {
    type Session: PushSession;

    /// Establish one connection. Resolves once the channel is open.
    fn connect(&self) -> impl Future<Output = Result<Self::Session, Error>> + Send;
}

/// One open push-channel connection.
pub trait PushSession: Send + 'static {
    /// Send a text frame.
    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), Error>> + Send;

    /// Wait for the next text frame.
    ///
    /// `None` means the peer closed the connection cleanly.
    fn next_text(&mut self) -> impl Future<Output = Option<Result<String, Error>>> + Send;

    /// Request closure. Best effort; errors are swallowed.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Request/response source of full snapshots.
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<WireSnapshot, Error>> + Send;
}
