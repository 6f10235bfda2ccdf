//! `astroviz snapshot`: one-shot fetch (or file read) and summary.

use tabled::Tabled;

use astroviz_api::SnapshotClient;
use astroviz_core::{CloseApproach, Snapshot, TrackedObject, normalize};

use crate::cli::{GlobalOpts, SnapshotArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct ObjectRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "NORAD")]
    pub norad_id: u32,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Health")]
    pub health: String,
    #[tabled(rename = "Position (km)")]
    pub position: String,
    #[tabled(rename = "Approaches")]
    pub approaches: usize,
}

impl ObjectRow {
    pub fn new(obj: &TrackedObject, color: bool) -> Self {
        let p = obj.position;
        Self {
            id: obj.id.to_string(),
            norad_id: obj.norad_id,
            name: obj.name.clone(),
            kind: obj.kind.to_string(),
            health: output::paint_health(obj.status(), color),
            position: format!(
                "{}, {}, {}",
                output::fmt_km(p.x()),
                output::fmt_km(p.y()),
                output::fmt_km(p.z())
            ),
            approaches: obj.close_approaches.len(),
        }
    }
}

#[derive(Tabled)]
struct ApproachRow {
    #[tabled(rename = "Time (UTC)")]
    time: String,
    #[tabled(rename = "Primary")]
    primary: String,
    #[tabled(rename = "Secondary")]
    secondary: String,
    #[tabled(rename = "Miss (km)")]
    miss: String,
    #[tabled(rename = "Rel. vel (km/s)")]
    velocity: String,
}

impl From<&CloseApproach> for ApproachRow {
    fn from(ev: &CloseApproach) -> Self {
        Self {
            time: ev.time.format("%Y-%m-%d %H:%M:%S").to_string(),
            primary: ev.primary_id.to_string(),
            secondary: ev.secondary_id.to_string(),
            miss: output::fmt_km(ev.miss_distance_km),
            velocity: output::fmt_km(ev.relative_velocity_kps),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &SnapshotArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = match &args.file {
        Some(path) => super::read_snapshot_file(path)?,
        None => fetch(global).await?,
    };

    let rendered = match output::render_structured(global.output, &snapshot)? {
        Some(json) => json,
        None => render_summary(&snapshot, output::should_color(global.color)),
    };
    output::print_output(&rendered);
    Ok(())
}

async fn fetch(global: &GlobalOpts) -> Result<Snapshot, CliError> {
    let engine = config::resolve(global)?.to_engine_config()?;
    let client = SnapshotClient::new(&engine.http_url, &engine.transport())?;
    tracing::info!(url = %client.endpoint(), "fetching snapshot");
    let wire = client.snapshot().await?;
    Ok(normalize(&Snapshot::try_from(wire)?))
}

fn render_summary(snapshot: &Snapshot, color: bool) -> String {
    let (start, end) = snapshot.window();
    let stats = snapshot.stats;
    let mut out = format!(
        "Epoch:    {}\nWindow:   {} .. {}\nTracked:  {} ({} debris)\nHealth:   {} nominal, {} warning, {} critical\n",
        snapshot.epoch.to_rfc3339(),
        start.to_rfc3339(),
        end.to_rfc3339(),
        stats.tracked,
        stats.debris,
        stats.nominal(),
        stats.warnings,
        stats.critical,
    );

    if !snapshot.objects.is_empty() {
        let rows: Vec<ObjectRow> = snapshot
            .objects
            .iter()
            .map(|o| ObjectRow::new(o, color))
            .collect();
        out.push('\n');
        out.push_str(&output::render_table(&rows));
        out.push('\n');
    }

    if snapshot.close_approaches.is_empty() {
        out.push_str("\nNo close approaches.");
    } else {
        let rows: Vec<ApproachRow> = snapshot.close_approaches.iter().map(Into::into).collect();
        out.push_str(&format!("\nClose approaches ({}):\n", rows.len()));
        out.push_str(&output::render_table(&rows));
    }
    out
}
