// ── Snapshot normalization ──

use crate::model::{CloseApproach, Snapshot, Stats, TrackedObject};

use super::merge::merge_close_approaches;

/// Canonical form of a full snapshot: events deduplicated and ordered,
/// every object linked to the events that name it, stats recounted.
///
/// `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(snapshot: &Snapshot) -> Snapshot {
    let close_approaches = merge_close_approaches(&[], &snapshot.close_approaches);
    let mut objects = snapshot.objects.clone();
    link_close_approaches(&mut objects, &close_approaches);

    Snapshot {
        epoch: snapshot.epoch,
        start: snapshot.start,
        end: snapshot.end,
        stats: Stats::count(&objects),
        close_approaches,
        objects,
    }
}

/// Replace each object's event list with the ordered subset of `events`
/// that name it on either side. Self-pairs are listed once.
pub(crate) fn link_close_approaches(objects: &mut [TrackedObject], events: &[CloseApproach]) {
    for obj in objects {
        obj.close_approaches = events
            .iter()
            .filter(|e| e.involves(&obj.id))
            .cloned()
            .collect();
    }
}
