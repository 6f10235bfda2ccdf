//! CLI-side config resolution: file and env via `astroviz-config`, then
//! command-line overrides on top.

use astroviz_config::Config;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Effective configuration for this invocation.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = astroviz_config::load_config(global.config.as_deref())?;
    if let Some(ref ws) = global.ws_url {
        cfg.daemon_ws.clone_from(ws);
    }
    if let Some(ref http) = global.http_url {
        cfg.daemon_http.clone_from(http);
    }
    Ok(cfg)
}
