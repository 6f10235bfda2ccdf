//! Canonical domain model.
//!
//! Wire payloads are converted into these types by [`crate::convert`];
//! everything downstream (pipeline, store, timeline) works only with them.

mod approach;
mod object;
mod snapshot;
mod vector;

pub use approach::{ApproachKey, CloseApproach};
pub use object::{HealthRecord, HealthStatus, ObjectId, ObjectKind, TrackedObject};
pub use snapshot::{
    DEFAULT_WINDOW_AFTER, DEFAULT_WINDOW_BEFORE, ObjectPatch, PartialUpdate, Snapshot, Stats,
};
pub use vector::Vec3;

/// Fixture builders shared by unit tests across the crate.
#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use super::*;

    /// 2025-03-01T12:00:00Z plus `secs`.
    pub fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).single().unwrap_or_default()
            + TimeDelta::seconds(secs)
    }

    pub fn health(status: HealthStatus) -> HealthRecord {
        HealthRecord {
            status,
            battery: 0.9,
            thermal: 0.8,
            comms: 0.95,
            last_contact: at(-60),
        }
    }

    pub fn object(id: &str, kind: ObjectKind, status: HealthStatus) -> TrackedObject {
        TrackedObject {
            id: ObjectId::from(id),
            norad_id: id.parse().unwrap_or(0),
            name: format!("OBJ-{id}"),
            kind,
            position: Vec3::ZERO,
            velocity: Vec3::new(1.0, 0.0, 0.0),
            health: health(status),
            close_approaches: Vec::new(),
        }
    }

    pub fn satellite(id: &str) -> TrackedObject {
        object(id, ObjectKind::Satellite, HealthStatus::Nominal)
    }

    pub fn approach(primary: &str, secondary: &str, secs: i64, miss: f64) -> CloseApproach {
        CloseApproach {
            time: at(secs),
            primary_id: ObjectId::from(primary),
            secondary_id: ObjectId::from(secondary),
            miss_distance_km: miss,
            relative_velocity_kps: 10.0,
        }
    }

    pub fn snapshot(objects: Vec<TrackedObject>, events: Vec<CloseApproach>) -> Snapshot {
        Snapshot {
            epoch: at(0),
            start: None,
            end: None,
            close_approaches: events,
            objects,
            stats: Stats::default(),
        }
    }
}
