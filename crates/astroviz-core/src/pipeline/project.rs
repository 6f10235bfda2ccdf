// ── Kinematic projection ──
//
// Straight-line extrapolation, position + velocity * dt. No orbital
// mechanics; good for minutes to a few hours either side of the epoch.

use chrono::{DateTime, TimeDelta, Utc};

use crate::model::{TrackedObject, Vec3};

/// Offsets smaller than this (in seconds) are treated as "no change" by
/// callers that want to skip the work.
pub const NEGLIGIBLE_OFFSET_SECS: f64 = 1.0;

/// Position of `object` after `delta_secs` seconds (negative looks back).
pub fn project(object: &TrackedObject, delta_secs: f64) -> Vec3 {
    object.position + object.velocity * delta_secs
}

/// Every object moved by `delta_secs`. The input is left untouched.
pub fn project_objects(objects: &[TrackedObject], delta_secs: f64) -> Vec<TrackedObject> {
    objects
        .iter()
        .map(|obj| TrackedObject {
            position: project(obj, delta_secs),
            ..obj.clone()
        })
        .collect()
}

/// Signed seconds from `from` to `to`, at millisecond resolution.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

/// Offset in seconds as a `TimeDelta`, rounded to the millisecond.
/// `None` for non-finite offsets and offsets beyond `TimeDelta`'s range.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn offset_delta(offset_secs: f64) -> Option<TimeDelta> {
    if !offset_secs.is_finite() {
        return None;
    }
    TimeDelta::try_milliseconds((offset_secs * 1000.0).round() as i64)
}

pub fn is_negligible(delta_secs: f64) -> bool {
    delta_secs.abs() < NEGLIGIBLE_OFFSET_SECS
}
