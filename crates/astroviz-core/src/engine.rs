// ── Engine ──
//
// Owns one store and the two background tasks that feed it: the push
// channel manager and the poll fallback. Cheaply cloneable; all clones
// share the same state. Dropping the last clone tears everything down.

use std::sync::Arc;

use astroviz_api::{PushConnector, SnapshotClient, SnapshotSource, WebSocketConnector};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::channel::ChannelManager;
use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::model::Snapshot;
use crate::poll::PollFallback;
use crate::store::{StateView, StreamState, StreamStore};

/// Engine wired to the real WebSocket and HTTP transports.
pub type LiveEngine = Engine<WebSocketConnector, SnapshotClient>;

pub struct Engine<C, S> {
    inner: Arc<EngineInner<C, S>>,
}

struct EngineInner<C, S> {
    config: EngineConfig,
    store: Arc<StreamStore>,
    /// Taken by `start`; `None` once the tasks own them.
    transports: Mutex<Option<(C, S)>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<C, S> Drop for EngineInner<C, S> {
    fn drop(&mut self) {
        self.store.close();
        self.cancel.cancel();
    }
}

impl<C, S> Clone for Engine<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl LiveEngine {
    /// Build an engine against the daemon named in `config`. Does not
    /// connect; call [`start`](Engine::start).
    pub fn from_config(config: EngineConfig, placeholder: Snapshot) -> Result<Self, CoreError> {
        let connector = WebSocketConnector::new(config.ws_url.clone(), config.connect_timeout);
        let source = SnapshotClient::new(&config.http_url, &config.transport())?;
        Ok(Self::new(config, connector, source, placeholder))
    }
}

impl<C: PushConnector, S: SnapshotSource> Engine<C, S> {
    /// Create an engine holding `placeholder` until real data arrives.
    pub fn new(config: EngineConfig, connector: C, source: S, placeholder: Snapshot) -> Self {
        let store = Arc::new(StreamStore::new(placeholder, config.stale_updates));
        Self {
            inner: Arc::new(EngineInner {
                config,
                store,
                transports: Mutex::new(Some((connector, source))),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Spawn the channel manager and poll fallback. Once only.
    pub async fn start(&self) -> Result<(), CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::EngineStopped);
        }
        let Some((connector, source)) = self.inner.transports.lock().await.take() else {
            return Err(CoreError::Internal("engine already started".into()));
        };

        let config = &self.inner.config;
        let channel = ChannelManager::new(
            connector,
            Arc::clone(&self.inner.store),
            config.reconnect_delay,
        );
        let poller = PollFallback::new(source, Arc::clone(&self.inner.store), config.poll_interval);

        let mut handles = self.inner.task_handles.lock().await;
        handles.push(tokio::spawn(channel.run(self.inner.cancel.clone())));
        handles.push(tokio::spawn(poller.run(self.inner.cancel.clone())));

        info!(
            ws = %config.ws_url,
            http = %config.http_url,
            stale_updates = %config.stale_updates,
            "engine started"
        );
        Ok(())
    }

    /// Close the store, cancel both tasks and wait for them to finish.
    /// Idempotent.
    pub async fn shutdown(&self) {
        self.inner.store.close();
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "engine task ended abnormally");
            }
        }
        drop(handles);

        self.inner.transports.lock().await.take();
        debug!("engine stopped");
    }
}

impl<C, S> Engine<C, S> {
    /// Current snapshot, effective status and last error.
    pub fn view(&self) -> StateView {
        self.inner.store.view()
    }

    pub fn subscribe(&self) -> watch::Receiver<StreamState> {
        self.inner.store.subscribe()
    }

    pub fn stream(&self) -> WatchStream<StreamState> {
        self.inner.store.stream()
    }

    pub fn store(&self) -> &Arc<StreamStore> {
        &self.inner.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}
