// In-memory transports for driving the channel manager, poller and engine
// under paused tokio time.
#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use astroviz_api::{
    Error, PushConnector, PushSession, SnapshotSource, WireHealth, WireObject, WireSnapshot,
};
use tokio::sync::mpsc;

use crate::model::test_support::at;

/// Let spawned tasks run until they block, without moving the clock.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// Advance paused time by `secs` and let tasks react.
pub async fn advance_secs(secs: f64) {
    tokio::time::advance(Duration::from_secs_f64(secs)).await;
    settle().await;
}

// ── Wire fixtures ────────────────────────────────────────────────────

pub fn wire_object(id: &str) -> WireObject {
    WireObject {
        id: id.into(),
        norad_id: id.parse().unwrap_or(0),
        name: format!("OBJ-{id}"),
        kind: "satellite".into(),
        position: [0.0, 0.0, 0.0],
        velocity: [1.0, 0.0, 0.0],
        health: WireHealth {
            status: "nominal".into(),
            battery: 0.9,
            thermal: 0.9,
            comms: 0.9,
            last_contact: at(-60),
        },
        close_approaches: None,
    }
}

pub fn wire_snapshot(epoch_secs: i64, ids: &[&str]) -> WireSnapshot {
    WireSnapshot {
        epoch: at(epoch_secs),
        start: None,
        end: None,
        objects: ids.iter().map(|id| wire_object(id)).collect(),
        close_approaches: Vec::new(),
        stats: None,
    }
}

pub fn snapshot_frame(epoch_secs: i64, ids: &[&str]) -> String {
    serde_json::json!({ "kind": "snapshot", "snapshot": wire_snapshot(epoch_secs, ids) })
        .to_string()
}

pub fn update_frame(epoch_secs: i64) -> String {
    serde_json::json!({
        "kind": "update",
        "update": { "epoch": at(epoch_secs), "objects": [] }
    })
    .to_string()
}

// ── Push channel ─────────────────────────────────────────────────────

/// Test-side handle to a [`FakeSession`].
pub struct SessionHandle {
    frames: Option<mpsc::UnboundedSender<Result<String, Error>>>,
    sent: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl SessionHandle {
    pub fn push(&self, text: impl Into<String>) {
        if let Some(tx) = &self.frames {
            let _ = tx.send(Ok(text.into()));
        }
    }

    pub fn fail(&self, err: Error) {
        if let Some(tx) = &self.frames {
            let _ = tx.send(Err(err));
        }
    }

    /// Peer closes cleanly.
    pub fn hang_up(&mut self) {
        self.frames = None;
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub struct FakeSession {
    frames: mpsc::UnboundedReceiver<Result<String, Error>>,
    sent: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl FakeSession {
    pub fn pair() -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sent = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(AtomicBool::new(false));
        (
            Self {
                frames: rx,
                sent: Arc::clone(&sent),
                closed: Arc::clone(&closed),
            },
            SessionHandle {
                frames: Some(tx),
                sent,
                closed,
            },
        )
    }
}

impl PushSession for FakeSession {
    async fn send_text(&mut self, text: String) -> Result<(), Error> {
        self.sent.lock().unwrap().push(text);
        Ok(())
    }

    async fn next_text(&mut self) -> Option<Result<String, Error>> {
        self.frames.recv().await
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Hands out planned sessions in order. Once the plan runs out, `connect`
/// never resolves.
#[derive(Clone, Default)]
pub struct FakeConnector {
    plans: Arc<Mutex<VecDeque<Result<FakeSession, String>>>>,
    attempts: Arc<AtomicUsize>,
}

impl FakeConnector {
    pub fn open_session(&self) -> SessionHandle {
        let (session, handle) = FakeSession::pair();
        self.plans.lock().unwrap().push_back(Ok(session));
        handle
    }

    pub fn refuse(&self, reason: &str) {
        self.plans.lock().unwrap().push_back(Err(reason.to_owned()));
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl PushConnector for FakeConnector {
    type Session = FakeSession;

    async fn connect(&self) -> Result<FakeSession, Error> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let plan = self.plans.lock().unwrap().pop_front();
        match plan {
            Some(Ok(session)) => Ok(session),
            Some(Err(reason)) => Err(Error::WebSocketConnect(reason)),
            None => std::future::pending().await,
        }
    }
}

// ── Poll source ──────────────────────────────────────────────────────

/// Returns queued responses in order, then HTTP 503 forever. Each fetch
/// takes `latency` of (paused) time.
#[derive(Clone, Default)]
pub struct FakeSource {
    responses: Arc<Mutex<VecDeque<Result<WireSnapshot, u16>>>>,
    calls: Arc<AtomicUsize>,
    latency: Arc<Mutex<Duration>>,
}

impl FakeSource {
    pub fn respond(&self, snapshot: WireSnapshot) {
        self.responses.lock().unwrap().push_back(Ok(snapshot));
    }

    pub fn respond_status(&self, status: u16) {
        self.responses.lock().unwrap().push_back(Err(status));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }
}

impl SnapshotSource for FakeSource {
    async fn fetch_snapshot(&self) -> Result<WireSnapshot, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(snapshot)) => Ok(snapshot),
            Some(Err(status)) => Err(Error::HttpStatus { status }),
            None => Err(Error::HttpStatus { status: 503 }),
        }
    }
}
