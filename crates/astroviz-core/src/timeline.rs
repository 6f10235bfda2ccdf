// ── Timeline, playhead and scene ──
//
// Per-read presentation values derived from a snapshot: the scrub range,
// the playhead position, and the projected scene with its highlight set.
// Nothing here is stored; everything is recomputed from the current view.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::model::{ObjectId, Snapshot, TrackedObject};
use crate::pipeline::{is_negligible, offset_delta, project_objects, seconds_between};

/// Slider granularity in seconds.
pub const TIMELINE_STEP_SECS: i64 = 30;

/// Close approaches within this distance of the scrub time are highlighted.
pub const HIGHLIGHT_WINDOW: TimeDelta = TimeDelta::minutes(30);

// ── Range ────────────────────────────────────────────────────────────

/// Scrub range in whole seconds relative to the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRange {
    pub min_offset_secs: i64,
    pub max_offset_secs: i64,
    pub step_secs: i64,
    /// Whole minutes from window start to end, truncated.
    pub span_minutes: i64,
}

impl TimelineRange {
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn of(snapshot: &Snapshot) -> Self {
        let (start, end) = snapshot.window();
        Self {
            min_offset_secs: seconds_between(snapshot.epoch, start).floor() as i64,
            max_offset_secs: seconds_between(snapshot.epoch, end).ceil() as i64,
            step_secs: TIMELINE_STEP_SECS,
            span_minutes: (end - start).num_minutes(),
        }
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn clamp(&self, offset_secs: f64) -> f64 {
        offset_secs.clamp(self.min_offset_secs as f64, self.max_offset_secs as f64)
    }
}

// ── Playhead ─────────────────────────────────────────────────────────

/// Scrub position. Live mode pins the offset to zero and follows each new
/// epoch; scrubbing away from zero leaves live mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Playhead {
    offset_secs: f64,
    live: bool,
    epoch: Option<DateTime<Utc>>,
}

impl Default for Playhead {
    fn default() -> Self {
        Self {
            offset_secs: 0.0,
            live: true,
            epoch: None,
        }
    }
}

impl Playhead {
    pub fn offset_secs(&self) -> f64 {
        self.offset_secs
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Move to `offset_secs`. Anything under a second snaps back to live.
    pub fn scrub(&mut self, offset_secs: f64) {
        self.live = is_negligible(offset_secs);
        self.offset_secs = if self.live { 0.0 } else { offset_secs };
    }

    pub fn jump_to_live(&mut self) {
        self.offset_secs = 0.0;
        self.live = true;
    }

    /// Note the snapshot epoch; in live mode a new epoch resets the offset.
    pub fn observe_epoch(&mut self, epoch: DateTime<Utc>) {
        if self.epoch != Some(epoch) && self.live {
            self.offset_secs = 0.0;
        }
        self.epoch = Some(epoch);
    }
}

// ── Scene ────────────────────────────────────────────────────────────

/// User focus feeding the highlight set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Focus {
    pub selected: Option<ObjectId>,
    /// Pair under the pointer in a close-approach list.
    pub hovered: Option<(ObjectId, ObjectId)>,
}

/// Objects as they stand at one scrub time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub at: DateTime<Utc>,
    pub offset_secs: f64,
    pub objects: Vec<TrackedObject>,
    pub highlighted: BTreeSet<ObjectId>,
}

impl Scene {
    pub fn object(&self, id: &str) -> Option<&TrackedObject> {
        self.objects.iter().find(|o| o.id.as_str() == id)
    }

    pub fn is_highlighted(&self, id: &ObjectId) -> bool {
        self.highlighted.contains(id)
    }
}

/// Project `snapshot` to `offset_secs` from its epoch and work out what
/// should be highlighted there. Fails when the scrub time falls outside
/// the representable date range.
pub fn scene_at(
    snapshot: &Snapshot,
    offset_secs: f64,
    focus: &Focus,
) -> Result<Scene, CoreError> {
    let at = offset_delta(offset_secs)
        .and_then(|delta| snapshot.epoch.checked_add_signed(delta))
        .ok_or_else(|| {
            CoreError::validation(
                "offset",
                format!(
                    "{offset_secs}s from {} is outside the supported date range",
                    snapshot.epoch
                ),
            )
        })?;

    let objects = if is_negligible(offset_secs) {
        snapshot.objects.clone()
    } else {
        project_objects(&snapshot.objects, offset_secs)
    };

    let mut highlighted = BTreeSet::new();
    if let Some((a, b)) = &focus.hovered {
        highlighted.insert(a.clone());
        highlighted.insert(b.clone());
    }
    if let Some(selected) = &focus.selected {
        highlighted.insert(selected.clone());
    }
    for event in &snapshot.close_approaches {
        if (event.time - at).num_milliseconds().abs() < HIGHLIGHT_WINDOW.num_milliseconds() {
            highlighted.insert(event.primary_id.clone());
            highlighted.insert(event.secondary_id.clone());
        }
    }

    Ok(Scene {
        at,
        offset_secs,
        objects,
        highlighted,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Vec3;
    use crate::model::test_support::{approach, at, satellite, snapshot};

    #[test]
    fn default_range_spans_eight_hours() {
        let range = TimelineRange::of(&Snapshot::empty(at(0)));
        assert_eq!(range.min_offset_secs, -7200);
        assert_eq!(range.max_offset_secs, 21600);
        assert_eq!(range.span_minutes, 480);
        assert_eq!(range.step_secs, 30);
    }

    #[test]
    fn range_rounds_outward() {
        let mut s = Snapshot::empty(at(0));
        s.start = Some(at(-90) + TimeDelta::milliseconds(500));
        s.end = Some(at(90) + TimeDelta::milliseconds(250));
        let range = TimelineRange::of(&s);
        assert_eq!(range.min_offset_secs, -90);
        assert_eq!(range.max_offset_secs, 91);
        assert_eq!(range.span_minutes, 2);
        assert!((range.clamp(500.0) - 91.0).abs() < f64::EPSILON);
    }

    #[test]
    fn playhead_leaves_and_returns_to_live() {
        let mut playhead = Playhead::default();
        assert!(playhead.is_live());

        playhead.scrub(-600.0);
        assert!(!playhead.is_live());
        assert!((playhead.offset_secs() + 600.0).abs() < f64::EPSILON);

        playhead.scrub(0.4);
        assert!(playhead.is_live());
        assert!(playhead.offset_secs().abs() < f64::EPSILON);

        playhead.scrub(120.0);
        playhead.jump_to_live();
        assert!(playhead.is_live());
        assert!(playhead.offset_secs().abs() < f64::EPSILON);
    }

    #[test]
    fn new_epoch_resets_only_in_live_mode() {
        let mut playhead = Playhead::default();
        playhead.observe_epoch(at(0));
        playhead.scrub(300.0);
        playhead.observe_epoch(at(30));
        assert!((playhead.offset_secs() - 300.0).abs() < f64::EPSILON);

        playhead.jump_to_live();
        playhead.observe_epoch(at(60));
        assert!(playhead.offset_secs().abs() < f64::EPSILON);
    }

    #[test]
    fn sub_second_scene_is_unprojected() {
        let s = snapshot(vec![satellite("1")], Vec::new());
        let scene = scene_at(&s, 0.5, &Focus::default()).unwrap();
        assert_eq!(scene.objects[0].position, Vec3::ZERO);

        let scene = scene_at(&s, 60.0, &Focus::default()).unwrap();
        assert_eq!(scene.objects[0].position, Vec3::new(60.0, 0.0, 0.0));
        assert_eq!(scene.at, at(60));
    }

    #[test]
    fn offset_beyond_date_range_is_an_error() {
        let s = snapshot(vec![satellite("1")], Vec::new());
        assert!(scene_at(&s, 1e13, &Focus::default()).is_err());
        assert!(scene_at(&s, f64::NAN, &Focus::default()).is_err());

        let edge = Snapshot::empty(DateTime::<Utc>::MAX_UTC);
        let err = scene_at(&edge, 60.0, &Focus::default()).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "offset"));
    }

    #[test]
    fn highlights_selection_hover_and_nearby_approaches() {
        let s = snapshot(
            vec![satellite("1"), satellite("2"), satellite("3"), satellite("4")],
            vec![
                approach("1", "2", 29 * 60, 3.0),
                approach("3", "4", 30 * 60, 3.0),
            ],
        );
        let focus = Focus {
            selected: Some(ObjectId::from("9")),
            hovered: Some((ObjectId::from("5"), ObjectId::from("6"))),
        };
        let scene = scene_at(&s, 0.0, &focus).unwrap();
        let ids: Vec<&str> = scene.highlighted.iter().map(ObjectId::as_str).collect();
        assert_eq!(ids, vec!["1", "2", "5", "6", "9"]);

        // Scrubbing forward brings the second event into range.
        let later = scene_at(&s, 120.0, &Focus::default()).unwrap();
        assert!(later.is_highlighted(&ObjectId::from("3")));
    }
}
