// ── Partial update reconciliation ──

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::CoreError;
use crate::model::{PartialUpdate, Snapshot, Stats};

use super::merge::merge_close_approaches;
use super::normalize::link_close_approaches;
use super::project::{project, seconds_between};

/// Apply `update` to `current`, producing the next snapshot.
///
/// Patches touch only ids already present; unknown ids are skipped. Every
/// object is then projected by the epoch delta, which may be negative.
/// Events are merged and re-linked only when the update carries a list.
///
/// Fails when the epoch shift would move a window bound past the
/// representable date range; `current` is untouched either way.
pub fn reconcile(current: &Snapshot, update: &PartialUpdate) -> Result<Snapshot, CoreError> {
    let shift = update.epoch - current.epoch;
    let start = current.start.map(|t| shift_bound(t, shift)).transpose()?;
    let end = current.end.map(|t| shift_bound(t, shift)).transpose()?;

    let mut objects = current.objects.clone();

    let index: HashMap<&str, usize> = current
        .objects
        .iter()
        .enumerate()
        .map(|(i, o)| (o.id.as_str(), i))
        .collect();
    for patch in &update.objects {
        if let Some(&i) = index.get(patch.id.as_str()) {
            patch.apply_to(&mut objects[i]);
        }
    }

    let delta_secs = seconds_between(current.epoch, update.epoch);
    for obj in &mut objects {
        obj.position = project(obj, delta_secs);
    }

    let close_approaches = match &update.close_approaches {
        Some(incoming) => {
            let merged = merge_close_approaches(&current.close_approaches, incoming);
            link_close_approaches(&mut objects, &merged);
            merged
        }
        None => current.close_approaches.clone(),
    };

    Ok(Snapshot {
        epoch: update.epoch,
        start,
        end,
        stats: Stats::count(&objects),
        close_approaches,
        objects,
    })
}

fn shift_bound(bound: DateTime<Utc>, shift: TimeDelta) -> Result<DateTime<Utc>, CoreError> {
    bound.checked_add_signed(shift).ok_or_else(|| {
        CoreError::validation(
            "update.epoch",
            format!("shifting window bound {bound} by {shift} leaves the supported date range"),
        )
    })
}
