// ── Wire → domain conversion ──
//
// Validates daemon payloads on the way in. Anything that would put an
// out-of-range value into the model is rejected as a whole message.
// Server-supplied stats and per-object event lists are discarded; the
// normalizer rebuilds both from the canonical lists.

use std::str::FromStr;

use astroviz_api::{
    WireCloseApproach, WireHealth, WireObject, WireObjectPatch, WirePartialUpdate, WireSnapshot,
};

use crate::error::CoreError;
use crate::model::{
    CloseApproach, HealthRecord, HealthStatus, ObjectId, ObjectKind, ObjectPatch, PartialUpdate,
    Snapshot, Stats, TrackedObject, Vec3,
};

fn ratio(field: &str, value: f64) -> Result<f64, CoreError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(CoreError::validation(
            field,
            format!("{value} is outside [0, 1]"),
        ))
    }
}

fn non_negative(field: &str, value: f64) -> Result<f64, CoreError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CoreError::validation(
            field,
            format!("{value} must be finite and non-negative"),
        ))
    }
}

fn vector(field: &str, value: [f64; 3]) -> Result<Vec3, CoreError> {
    let v = Vec3::from(value);
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::validation(field, format!("{value:?} is not finite")))
    }
}

fn non_empty_id(field: &str, id: String) -> Result<ObjectId, CoreError> {
    if id.is_empty() {
        Err(CoreError::validation(field, "empty id"))
    } else {
        Ok(ObjectId::from(id))
    }
}

fn approaches(list: Vec<WireCloseApproach>) -> Result<Vec<CloseApproach>, CoreError> {
    list.into_iter().map(CloseApproach::try_from).collect()
}

impl TryFrom<WireHealth> for HealthRecord {
    type Error = CoreError;

    fn try_from(w: WireHealth) -> Result<Self, Self::Error> {
        let status = HealthStatus::from_str(&w.status).map_err(|_| {
            CoreError::validation("health.status", format!("unknown status `{}`", w.status))
        })?;
        Ok(Self {
            status,
            battery: ratio("health.battery", w.battery)?,
            thermal: ratio("health.thermal", w.thermal)?,
            comms: ratio("health.comms", w.comms)?,
            last_contact: w.last_contact,
        })
    }
}

impl TryFrom<WireCloseApproach> for CloseApproach {
    type Error = CoreError;

    fn try_from(w: WireCloseApproach) -> Result<Self, Self::Error> {
        Ok(Self {
            time: w.time,
            primary_id: non_empty_id("closeApproach.primaryId", w.primary_id)?,
            secondary_id: non_empty_id("closeApproach.secondaryId", w.secondary_id)?,
            miss_distance_km: non_negative("closeApproach.missDistanceKm", w.miss_distance_km)?,
            relative_velocity_kps: non_negative(
                "closeApproach.relativeVelocityKps",
                w.relative_velocity_kps,
            )?,
        })
    }
}

impl TryFrom<WireObject> for TrackedObject {
    type Error = CoreError;

    fn try_from(w: WireObject) -> Result<Self, Self::Error> {
        let kind = ObjectKind::from_str(&w.kind).map_err(|_| {
            CoreError::validation("object.kind", format!("unknown kind `{}`", w.kind))
        })?;
        Ok(Self {
            id: non_empty_id("object.id", w.id)?,
            norad_id: w.norad_id,
            name: w.name,
            kind,
            position: vector("object.position", w.position)?,
            velocity: vector("object.velocity", w.velocity)?,
            health: HealthRecord::try_from(w.health)?,
            close_approaches: Vec::new(),
        })
    }
}

impl TryFrom<WireSnapshot> for Snapshot {
    type Error = CoreError;

    fn try_from(w: WireSnapshot) -> Result<Self, Self::Error> {
        let objects = w
            .objects
            .into_iter()
            .map(TrackedObject::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            epoch: w.epoch,
            start: w.start,
            end: w.end,
            close_approaches: approaches(w.close_approaches)?,
            stats: Stats::count(&objects),
            objects,
        })
    }
}

impl TryFrom<WireObjectPatch> for ObjectPatch {
    type Error = CoreError;

    fn try_from(w: WireObjectPatch) -> Result<Self, Self::Error> {
        Ok(Self {
            id: non_empty_id("patch.id", w.id)?,
            position: w.position.map(|p| vector("patch.position", p)).transpose()?,
            velocity: w.velocity.map(|v| vector("patch.velocity", v)).transpose()?,
            health: w.health.map(HealthRecord::try_from).transpose()?,
        })
    }
}

impl TryFrom<WirePartialUpdate> for PartialUpdate {
    type Error = CoreError;

    fn try_from(w: WirePartialUpdate) -> Result<Self, Self::Error> {
        Ok(Self {
            epoch: w.epoch,
            objects: w
                .objects
                .into_iter()
                .map(ObjectPatch::try_from)
                .collect::<Result<_, _>>()?,
            close_approaches: w.close_approaches.map(approaches).transpose()?,
        })
    }
}
