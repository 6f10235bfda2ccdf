//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use astroviz_config::ConfigError;
use astroviz_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 3;
    pub const DATA: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the daemon at {url}: {reason}")]
    #[diagnostic(
        code(astroviz::connection_failed),
        help(
            "Check that the OpenAstroViz daemon is running and reachable.\n\
             Override the address with --http-url / --ws-url or ASTROVIZ_DAEMON_HTTP."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Daemon request failed: {message}")]
    #[diagnostic(code(astroviz::api_error))]
    Api { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(astroviz::timeout),
        help("Raise timeout_secs in the config file or ASTROVIZ_TIMEOUT_SECS.")
    )]
    Timeout { seconds: u64 },

    // ── Data ─────────────────────────────────────────────────────────
    #[error("Invalid snapshot data: {reason}")]
    #[diagnostic(
        code(astroviz::invalid_snapshot),
        help("Snapshots must match the daemon wire format (camelCase, RFC 3339 timestamps).")
    )]
    InvalidSnapshot { reason: String },

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(astroviz::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(astroviz::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(astroviz::no_config),
        help("Pass an existing file with --config, or omit it to use defaults.")
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(astroviz::config))]
    Config { message: String },

    // ── Lifecycle / IO ───────────────────────────────────────────────
    #[error("Engine error: {message}")]
    #[diagnostic(code(astroviz::engine))]
    Engine { message: String },

    #[error(transparent)]
    #[diagnostic(code(astroviz::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Api { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::InvalidSnapshot { .. } | Self::Json(_) => exit_code::DATA,
            Self::Validation { .. } | Self::NoConfig { .. } | Self::Config { .. } => {
                exit_code::CONFIG
            }
            Self::Engine { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Api { message, .. } => Self::Api { message },
            CoreError::MalformedMessage { reason } => Self::InvalidSnapshot { reason },
            CoreError::Validation { field, reason } => Self::InvalidSnapshot {
                reason: format!("{field}: {reason}"),
            },
            CoreError::Config { message } => Self::Config { message },
            CoreError::EngineStopped => Self::Engine {
                message: "engine already stopped".into(),
            },
            CoreError::Internal(message) => Self::Engine { message },
        }
    }
}

impl From<astroviz_api::Error> for CliError {
    fn from(err: astroviz_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
