// astroviz-api: wire types and transports for the OpenAstroViz orbital stream.

pub mod error;
pub mod snapshot_client;
pub mod source;
pub mod transport;
pub mod websocket;
pub mod wire;

pub use error::Error;
pub use snapshot_client::SnapshotClient;
pub use source::{PushConnector, PushSession, SnapshotSource};
pub use transport::TransportConfig;
pub use websocket::{WebSocketConnector, WebSocketSession};
pub use wire::{
    StreamMessage, SubscribeRequest, WireCloseApproach, WireHealth, WireObject, WireObjectPatch,
    WirePartialUpdate, WireSnapshot, WireStats,
};
