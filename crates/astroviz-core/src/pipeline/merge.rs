// ── Close-approach merge ──

use indexmap::IndexMap;

use crate::model::{ApproachKey, CloseApproach};

/// Union of `existing` and `incoming`, keyed by (primary, secondary, time).
///
/// Incoming events replace existing ones with the same key, keeping the
/// existing slot's insertion position. The result is stable-sorted by time.
pub fn merge_close_approaches(
    existing: &[CloseApproach],
    incoming: &[CloseApproach],
) -> Vec<CloseApproach> {
    let mut by_key: IndexMap<ApproachKey, CloseApproach> =
        IndexMap::with_capacity(existing.len() + incoming.len());
    for event in existing.iter().chain(incoming) {
        by_key.insert(event.key(), event.clone());
    }

    let mut merged: Vec<CloseApproach> = by_key.into_values().collect();
    merged.sort_by_key(|e| e.time);
    merged
}
