//! Command handlers.

pub mod config_cmd;
pub mod project;
pub mod snapshot;
pub mod watch;

use std::path::Path;

use astroviz_api::WireSnapshot;
use astroviz_core::{Snapshot, normalize};

use crate::error::CliError;

/// Read a daemon-format snapshot file and normalize it.
pub fn read_snapshot_file(path: &Path) -> Result<Snapshot, CliError> {
    let text = std::fs::read_to_string(path)?;
    let wire: WireSnapshot = serde_json::from_str(&text)?;
    Ok(normalize(&Snapshot::try_from(wire)?))
}
