//! Clap derive structures for the `astroviz` CLI.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// astroviz -- watch and query the OpenAstroViz orbital state stream
#[derive(Debug, Parser)]
#[command(
    name = "astroviz",
    version,
    about = "Watch and query the OpenAstroViz orbital state stream",
    long_about = "Connects to an OpenAstroViz daemon over WebSocket, falls back to HTTP\n\
        snapshot polling while the stream is down, and projects object positions\n\
        forward or backward in time.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Push stream URL (overrides config)
    #[arg(long, env = "ASTROVIZ_DAEMON_WS", global = true)]
    pub ws_url: Option<String>,

    /// Daemon HTTP base URL (overrides config)
    #[arg(long, env = "ASTROVIZ_DAEMON_HTTP", global = true)]
    pub http_url: Option<String>,

    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "ASTROVIZ_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Follow the live stream and print every state change
    Watch(WatchArgs),

    /// Fetch one snapshot over HTTP (or read a file) and summarize it
    Snapshot(SnapshotArgs),

    /// Project a snapshot's objects to a time offset
    Project(ProjectArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this long (seconds, or a duration like `5m`)
    #[arg(long = "for", value_name = "DURATION", value_parser = parse_duration)]
    pub duration: Option<Duration>,
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Read the snapshot from a JSON file instead of the daemon
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Snapshot JSON file
    #[arg(long, short = 'f')]
    pub file: PathBuf,

    /// Seconds from the snapshot epoch (negative looks back)
    #[arg(long, allow_hyphen_values = true, default_value = "0")]
    pub offset: f64,

    /// Only show this object id
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,

    /// Print the default config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

/// Plain seconds (`90`) or a humantime duration (`1m 30s`).
fn parse_duration(raw: &str) -> Result<Duration, String> {
    if let Ok(secs) = raw.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(raw).map_err(|e| e.to_string())
}
