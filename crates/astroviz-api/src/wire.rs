//! Wire shapes exchanged with the OpenAstroViz daemon.
//!
//! These mirror the JSON the daemon sends, field for field (camelCase,
//! RFC 3339 timestamps). Classification fields (`kind`, `status`) stay as
//! strings here; `astroviz-core` validates them when converting into the
//! domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Longest raw body kept in a [`Error::Deserialization`] for diagnostics.
const MAX_ERROR_BODY: usize = 512;

// ── Snapshot ────────────────────────────────────────────────────────

/// Full orbital snapshot, pushed over the stream or returned by the poll endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSnapshot {
    pub epoch: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub objects: Vec<WireObject>,
    #[serde(default)]
    pub close_approaches: Vec<WireCloseApproach>,
    /// Server-computed aggregates. Informational only: consumers recount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<WireStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireObject {
    pub id: String,
    pub norad_id: u32,
    pub name: String,
    /// `"satellite"`, `"debris"` or `"rocket_body"`.
    pub kind: String,
    /// km, Earth-centered inertial.
    pub position: [f64; 3],
    /// km/s, same frame.
    pub velocity: [f64; 3],
    pub health: WireHealth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_approaches: Option<Vec<WireCloseApproach>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireHealth {
    /// `"nominal"`, `"warning"` or `"critical"`.
    pub status: String,
    pub battery: f64,
    pub thermal: f64,
    pub comms: f64,
    pub last_contact: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCloseApproach {
    pub time: DateTime<Utc>,
    pub primary_id: String,
    pub secondary_id: String,
    pub miss_distance_km: f64,
    pub relative_velocity_kps: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireStats {
    pub tracked: u64,
    pub debris: u64,
    pub warnings: u64,
    pub critical: u64,
}

// ── Partial update ──────────────────────────────────────────────────

/// Differential update: advances the epoch and patches a subset of objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePartialUpdate {
    pub epoch: DateTime<Utc>,
    #[serde(default)]
    pub objects: Vec<WireObjectPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_approaches: Option<Vec<WireCloseApproach>>,
}

/// Per-object field set. Absent fields keep their previous value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireObjectPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<WireHealth>,
}

// ── Stream envelope ─────────────────────────────────────────────────

/// Inbound message on the push stream, discriminated by `kind`.
///
/// Kinds other than `snapshot` and `update` (e.g. `telemetry`) decode to
/// [`StreamMessage::Other`] and are ignored by consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StreamMessage {
    Snapshot { snapshot: WireSnapshot },
    Update { update: WirePartialUpdate },
    #[serde(other)]
    Other,
}

impl StreamMessage {
    /// Decode a text frame.
    pub fn parse(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| deserialization_error(&e, text))
    }
}

/// Handshake sent once each time the push channel opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubscribeRequest {
    pub kind: &'static str,
    pub stream: &'static str,
}

impl SubscribeRequest {
    pub const ORBITS: Self = Self {
        kind: "subscribe",
        stream: "orbits",
    };

    /// JSON text of the handshake frame.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

pub(crate) fn deserialization_error(err: &serde_json::Error, body: &str) -> Error {
    let mut end = body.len().min(MAX_ERROR_BODY);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    Error::Deserialization {
        message: err.to_string(),
        body: body[..end].to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot_json() -> serde_json::Value {
        serde_json::json!({
            "epoch": "2025-03-01T12:00:00Z",
            "objects": [{
                "id": "25544",
                "noradId": 25544,
                "name": "ISS (ZARYA)",
                "kind": "satellite",
                "position": [4123.0, 5121.5, -5632.4],
                "velocity": [-5.124, 3.134, 2.145],
                "health": {
                    "status": "nominal",
                    "battery": 0.92,
                    "thermal": 0.88,
                    "comms": 0.94,
                    "lastContact": "2025-03-01T11:59:00Z"
                }
            }],
            "closeApproaches": [{
                "time": "2025-03-01T12:24:00Z",
                "primaryId": "25544",
                "secondaryId": "43013",
                "missDistanceKm": 9.4,
                "relativeVelocityKps": 12.1
            }]
        })
    }

    #[test]
    fn parse_snapshot_message() {
        let raw = serde_json::json!({ "kind": "snapshot", "snapshot": snapshot_json() });
        let StreamMessage::Snapshot { snapshot } = StreamMessage::parse(&raw.to_string()).unwrap()
        else {
            panic!("expected snapshot");
        };
        assert_eq!(snapshot.objects.len(), 1);
        assert_eq!(snapshot.objects[0].norad_id, 25544);
        assert_eq!(snapshot.objects[0].kind, "satellite");
        assert!(snapshot.start.is_none());
        assert!(snapshot.stats.is_none());
        assert_eq!(snapshot.close_approaches[0].miss_distance_km, 9.4);
    }

    #[test]
    fn parse_update_with_sparse_fields() {
        let raw = r#"{
            "kind": "update",
            "update": {
                "epoch": "2025-03-01T12:00:30Z",
                "objects": [{ "id": "25544", "position": [1.0, 2.0, 3.0] }]
            }
        }"#;

        let StreamMessage::Update { update } = StreamMessage::parse(raw).unwrap() else {
            panic!("expected update");
        };
        assert_eq!(update.objects[0].position, Some([1.0, 2.0, 3.0]));
        assert!(update.objects[0].velocity.is_none());
        assert!(update.objects[0].health.is_none());
        assert!(update.close_approaches.is_none());
    }

    #[test]
    fn unknown_kind_decodes_to_other() {
        let msg = StreamMessage::parse(r#"{"kind":"telemetry","payload":{}}"#).unwrap();
        assert_eq!(msg, StreamMessage::Other);
    }

    #[test]
    fn snapshot_kind_without_payload_is_malformed() {
        let err = StreamMessage::parse(r#"{"kind":"snapshot"}"#).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn garbage_is_malformed_and_keeps_body() {
        let err = StreamMessage::parse("not json at all").unwrap_err();
        match err {
            Error::Deserialization { body, .. } => assert_eq!(body, "not json at all"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn subscribe_handshake_shape() {
        let text = SubscribeRequest::ORBITS.to_json().unwrap();
        assert_eq!(text, r#"{"kind":"subscribe","stream":"orbits"}"#);
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "subscribe", "stream": "orbits" }));
        assert_eq!(
            serde_json::to_value(SubscribeRequest::ORBITS).unwrap(),
            json
        );
    }
}
