// ── Close-approach (conjunction) events ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::object::ObjectId;

/// A predicted or observed conjunction between two tracked objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseApproach {
    pub time: DateTime<Utc>,
    pub primary_id: ObjectId,
    pub secondary_id: ObjectId,
    pub miss_distance_km: f64,
    pub relative_velocity_kps: f64,
}

/// Identity of a close approach. Two events with equal keys are the same
/// event; the later arrival replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApproachKey {
    pub primary_id: ObjectId,
    pub secondary_id: ObjectId,
    pub time: DateTime<Utc>,
}

impl CloseApproach {
    pub fn key(&self) -> ApproachKey {
        ApproachKey {
            primary_id: self.primary_id.clone(),
            secondary_id: self.secondary_id.clone(),
            time: self.time,
        }
    }

    /// Whether `id` is either side of this event.
    pub fn involves(&self, id: &ObjectId) -> bool {
        self.primary_id == *id || self.secondary_id == *id
    }
}
