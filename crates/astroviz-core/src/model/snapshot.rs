// ── Snapshot, stats and partial updates ──

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::approach::CloseApproach;
use super::object::{HealthRecord, HealthStatus, ObjectId, TrackedObject};
use super::vector::Vec3;

/// Window half-widths used when a snapshot omits `start` / `end`.
pub const DEFAULT_WINDOW_BEFORE: TimeDelta = TimeDelta::hours(2);
pub const DEFAULT_WINDOW_AFTER: TimeDelta = TimeDelta::hours(6);

/// Aggregate counts. Always a recount over the snapshot's objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub tracked: usize,
    pub debris: usize,
    pub warnings: usize,
    pub critical: usize,
}

impl Stats {
    pub fn count(objects: &[TrackedObject]) -> Self {
        objects.iter().fold(
            Self {
                tracked: objects.len(),
                ..Self::default()
            },
            |mut stats, obj| {
                if obj.is_debris() {
                    stats.debris += 1;
                }
                match obj.status() {
                    HealthStatus::Warning => stats.warnings += 1,
                    HealthStatus::Critical => stats.critical += 1,
                    HealthStatus::Nominal => {}
                }
                stats
            },
        )
    }

    /// Objects that are neither warning nor critical.
    pub fn nominal(&self) -> usize {
        self.tracked
            .saturating_sub(self.warnings)
            .saturating_sub(self.critical)
    }
}

/// Complete orbital state at one epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub epoch: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Distinct events, ascending by time.
    #[serde(default)]
    pub close_approaches: Vec<CloseApproach>,
    #[serde(default)]
    pub objects: Vec<TrackedObject>,
    #[serde(default)]
    pub stats: Stats,
}

impl Snapshot {
    /// A snapshot with no objects or events.
    pub fn empty(epoch: DateTime<Utc>) -> Self {
        Self {
            epoch,
            start: None,
            end: None,
            close_approaches: Vec::new(),
            objects: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Effective time window, falling back to epoch −2 h / +6 h. Defaults
    /// saturate at the ends of the representable date range.
    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.start.unwrap_or_else(|| {
            self.epoch
                .checked_sub_signed(DEFAULT_WINDOW_BEFORE)
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        });
        let end = self.end.unwrap_or_else(|| {
            self.epoch
                .checked_add_signed(DEFAULT_WINDOW_AFTER)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        });
        (start, end)
    }

    pub fn object(&self, id: &str) -> Option<&TrackedObject> {
        self.objects.iter().find(|o| o.id.as_str() == id)
    }
}

/// Differential update advancing the epoch and patching a subset of objects.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    pub epoch: DateTime<Utc>,
    pub objects: Vec<ObjectPatch>,
    /// `None` leaves the event list and per-object links untouched.
    pub close_approaches: Option<Vec<CloseApproach>>,
}

/// Fields to overwrite on one object. `None` keeps the previous value.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatch {
    pub id: ObjectId,
    pub position: Option<Vec3>,
    pub velocity: Option<Vec3>,
    pub health: Option<HealthRecord>,
}

impl ObjectPatch {
    pub fn apply_to(&self, obj: &mut TrackedObject) {
        if let Some(position) = self.position {
            obj.position = position;
        }
        if let Some(velocity) = self.velocity {
            obj.velocity = velocity;
        }
        if let Some(health) = &self.health {
            obj.health = health.clone();
        }
    }
}
