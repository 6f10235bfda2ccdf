//! Configuration for the astroviz engine and CLI.
//!
//! Layers, lowest to highest: built-in defaults, a TOML file (the platform
//! config dir, or an explicit path), then `ASTROVIZ_*` environment
//! variables. The result is validated and translated into
//! `astroviz_core::EngineConfig`; core itself never reads files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use astroviz_core::{DEFAULT_HTTP_URL, DEFAULT_WS_URL, EngineConfig, StaleUpdatePolicy};

/// Prefix for environment overrides, e.g. `ASTROVIZ_DAEMON_WS`.
pub const ENV_PREFIX: &str = "ASTROVIZ_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// On-disk / environment shape. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Push stream endpoint.
    pub daemon_ws: String,
    /// Daemon HTTP base URL for snapshot polling.
    pub daemon_http: String,
    pub reconnect_delay_secs: u64,
    pub poll_interval_secs: u64,
    pub connect_timeout_secs: u64,
    /// Snapshot request timeout.
    pub timeout_secs: u64,
    pub stale_updates: StaleUpdatePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon_ws: DEFAULT_WS_URL.into(),
            daemon_http: DEFAULT_HTTP_URL.into(),
            reconnect_delay_secs: 5,
            poll_interval_secs: 60,
            connect_timeout_secs: 10,
            timeout_secs: 30,
            stale_updates: StaleUpdatePolicy::default(),
        }
    }
}

impl Config {
    /// Validate and convert into the engine's runtime config.
    pub fn to_engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let ws_url = parse_url("daemon_ws", &self.daemon_ws, &["ws", "wss"])?;
        let http_url = parse_url("daemon_http", &self.daemon_http, &["http", "https"])?;

        Ok(EngineConfig {
            ws_url,
            http_url,
            reconnect_delay: positive_secs("reconnect_delay_secs", self.reconnect_delay_secs)?,
            poll_interval: positive_secs("poll_interval_secs", self.poll_interval_secs)?,
            connect_timeout: positive_secs("connect_timeout_secs", self.connect_timeout_secs)?,
            request_timeout: positive_secs("timeout_secs", self.timeout_secs)?,
            stale_updates: self.stale_updates,
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn parse_url(field: &str, raw: &str, schemes: &[&str]) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| invalid(field, format!("`{raw}`: {e}")))?;
    if !schemes.contains(&url.scheme()) {
        return Err(invalid(
            field,
            format!("scheme `{}` not one of {}", url.scheme(), schemes.join(", ")),
        ));
    }
    Ok(url)
}

fn positive_secs(field: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(invalid(field, "must be at least 1 second"));
    }
    Ok(Duration::from_secs(secs))
}

// ── Config file path ────────────────────────────────────────────────

pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "openastroviz", "astroviz").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("astroviz");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Layered provider: defaults, then `file` (or the platform path), then env.
pub fn figment(file: Option<&Path>) -> Figment {
    let path = file.map_or_else(config_path, Path::to_path_buf);
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
}

/// Load configuration. An explicit `file` must exist; the platform file
/// is optional.
pub fn load_config(file: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = file {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(figment(file).extract()?)
}

/// Load, validate and translate in one step.
pub fn load_engine_config(file: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    load_config(file)?.to_engine_config()
}
