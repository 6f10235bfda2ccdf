//! Pure transformations from wire-derived data to canonical snapshots.
//!
//! Nothing in here does I/O or holds state; the store calls these inside
//! its install path and consumers call [`project_objects`] directly.

mod merge;
mod normalize;
mod project;
mod reconcile;

pub use merge::merge_close_approaches;
pub use normalize::normalize;
pub use project::{
    NEGLIGIBLE_OFFSET_SECS, is_negligible, offset_delta, project, project_objects,
    seconds_between,
};
pub use reconcile::reconcile;
