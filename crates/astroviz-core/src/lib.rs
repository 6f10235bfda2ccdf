//! Orbital state synchronization and propagation engine.
//!
//! `astroviz-core` keeps one authoritative [`Snapshot`] of tracked objects
//! in step with the OpenAstroViz daemon. A push stream delivers full
//! snapshots and incremental updates; while it is down, a poller fetches
//! full snapshots instead. Both feed a single [`StreamStore`] through the
//! pure [`pipeline`] functions, and consumers read [`StateView`]s and
//! project them with [`project_objects`] or [`timeline::scene_at`].
//!
//! ```no_run
//! use astroviz_core::{EngineConfig, LiveEngine, Snapshot};
//!
//! # async fn demo() -> Result<(), astroviz_core::CoreError> {
//! let engine = LiveEngine::from_config(EngineConfig::default(), Snapshot::empty(chrono::Utc::now()))?;
//! engine.start().await?;
//! let view = engine.view();
//! println!("{} objects, {}", view.snapshot.stats.tracked, view.status);
//! engine.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod poll;
pub mod store;
pub mod timeline;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::{ChannelManager, MessageOutcome, apply_message};
pub use config::{DEFAULT_HTTP_URL, DEFAULT_WS_URL, EngineConfig, StaleUpdatePolicy};
pub use engine::{Engine, LiveEngine};
pub use error::CoreError;
pub use model::{
    ApproachKey, CloseApproach, HealthRecord, HealthStatus, ObjectId, ObjectKind, ObjectPatch,
    PartialUpdate, Snapshot, Stats, TrackedObject, Vec3,
};
pub use pipeline::{merge_close_approaches, normalize, project, project_objects, reconcile};
pub use poll::PollFallback;
pub use store::{
    ConnectionStatus, DiscardReason, InstallOutcome, SnapshotOrigin, StateView, StreamState,
    StreamStore,
};
pub use timeline::{Focus, Playhead, Scene, TimelineRange, scene_at};
