//! `astroviz project`: positions at an offset from a snapshot's epoch.

use owo_colors::OwoColorize;
use tabled::Tabled;

use astroviz_core::{Focus, ObjectId, Playhead, Scene, TimelineRange, scene_at};

use crate::cli::{GlobalOpts, ProjectArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ProjectedRow {
    #[tabled(rename = "")]
    marker: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "X (km)")]
    x: String,
    #[tabled(rename = "Y (km)")]
    y: String,
    #[tabled(rename = "Z (km)")]
    z: String,
}

pub fn handle(args: &ProjectArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = super::read_snapshot_file(&args.file)?;

    let focus = Focus {
        selected: args.id.as_deref().map(ObjectId::from),
        hovered: None,
    };
    let range = TimelineRange::of(&snapshot);
    if (range.clamp(args.offset) - args.offset).abs() > f64::EPSILON {
        tracing::warn!(
            offset = args.offset,
            min = range.min_offset_secs,
            max = range.max_offset_secs,
            "offset lies outside the snapshot window"
        );
    }

    // Sub-second offsets snap back to the epoch, as the live playhead does.
    let mut playhead = Playhead::default();
    playhead.observe_epoch(snapshot.epoch);
    playhead.scrub(args.offset);

    let mut scene =
        scene_at(&snapshot, playhead.offset_secs(), &focus).map_err(|e| CliError::Validation {
            field: "offset".into(),
            reason: e.to_string(),
        })?;
    if let Some(ref id) = args.id {
        scene.objects.retain(|o| o.id.as_str() == id);
        if scene.objects.is_empty() {
            return Err(CliError::Validation {
                field: "id".into(),
                reason: format!("no object `{id}` in snapshot"),
            });
        }
    }

    let rendered = match output::render_structured(global.output, &scene)? {
        Some(json) => json,
        None => render_scene(&scene, output::should_color(global.color)),
    };
    output::print_output(&rendered);
    Ok(())
}

fn render_scene(scene: &Scene, color: bool) -> String {
    let rows: Vec<ProjectedRow> = scene
        .objects
        .iter()
        .map(|o| {
            let marker = match (scene.is_highlighted(&o.id), color) {
                (false, _) => String::new(),
                (true, true) => "*".yellow().to_string(),
                (true, false) => "*".into(),
            };
            ProjectedRow {
                marker,
                id: o.id.to_string(),
                name: o.name.clone(),
                x: output::fmt_km(o.position.x()),
                y: output::fmt_km(o.position.y()),
                z: output::fmt_km(o.position.z()),
            }
        })
        .collect();

    format!(
        "At: {} ({:+}s from epoch)\n{}",
        scene.at.to_rfc3339(),
        scene.offset_secs,
        output::render_table(&rows)
    )
}
