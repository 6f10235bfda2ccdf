//! `astroviz watch`: follow the engine and print each state change.

use serde::Serialize;

use astroviz_core::{
    ConnectionStatus, EngineConfig, LiveEngine, Snapshot, SnapshotOrigin, Stats, StreamState,
};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

/// One printed line per observed change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WatchEvent<'a> {
    status: ConnectionStatus,
    origin: SnapshotOrigin,
    revision: u64,
    epoch: String,
    stats: Stats,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<'a> From<&'a StreamState> for WatchEvent<'a> {
    fn from(state: &'a StreamState) -> Self {
        Self {
            status: state.effective_status(),
            origin: state.origin,
            revision: state.revision,
            epoch: state.snapshot.epoch.to_rfc3339(),
            stats: state.snapshot.stats,
            error: state.error.as_deref(),
        }
    }
}

pub async fn handle(
    args: &WatchArgs,
    config: EngineConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let engine = LiveEngine::from_config(config, Snapshot::empty(chrono::Utc::now()))?;
    let mut rx = engine.subscribe();
    engine.start().await?;

    let color = output::should_color(global.color);
    let limit = args.duration;
    let deadline = async move {
        match limit {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let mut last_line = None;
    let result = loop {
        let line = {
            let state = rx.borrow_and_update();
            render_event(&WatchEvent::from(&*state), global.output, color)
        };
        match line {
            Ok(line) if last_line.as_ref() != Some(&line) => {
                output::print_output(&line);
                last_line = Some(line);
            }
            Ok(_) => {}
            Err(e) => break Err(e),
        }

        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break Ok(()),
            () = &mut deadline => break Ok(()),
            changed = rx.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
            }
        }
    };

    engine.shutdown().await;
    result
}

fn render_event(
    event: &WatchEvent<'_>,
    format: OutputFormat,
    color: bool,
) -> Result<String, CliError> {
    // One line per event even for `json`, so output stays streamable.
    if format != OutputFormat::Table {
        return Ok(serde_json::to_string(event)?);
    }

    let s = event.stats;
    let mut line = format!(
        "[{}] {} epoch={} rev={} tracked={} debris={} warning={} critical={}",
        event.origin,
        output::paint_status(event.status, color),
        event.epoch,
        event.revision,
        s.tracked,
        s.debris,
        s.warnings,
        s.critical,
    );
    if let Some(err) = event.error {
        line.push_str(" error=");
        line.push_str(err);
    }
    Ok(line)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn event(error: Option<&str>) -> WatchEvent<'_> {
        WatchEvent {
            status: ConnectionStatus::Offline,
            origin: SnapshotOrigin::Poll,
            revision: 3,
            epoch: "2025-03-01T12:00:00+00:00".into(),
            stats: Stats {
                tracked: 4,
                debris: 1,
                warnings: 1,
                critical: 0,
            },
            error,
        }
    }

    #[test]
    fn table_line_carries_status_and_error() {
        let line = render_event(&event(Some("Request failed: 503")), OutputFormat::Table, false)
            .unwrap();
        assert_eq!(
            line,
            "[poll] offline epoch=2025-03-01T12:00:00+00:00 rev=3 tracked=4 debris=1 warning=1 critical=0 error=Request failed: 503"
        );
    }

    #[test]
    fn json_is_one_line_and_omits_missing_error() {
        let line = render_event(&event(None), OutputFormat::Json, false).unwrap();
        assert!(!line.contains('\n'));
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["status"], "offline");
        assert_eq!(v["origin"], "poll");
        assert_eq!(v["stats"]["tracked"], 4);
        assert!(v.get("error").is_none());
    }
}
