//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::resolve(global)?;
            // Surface validation problems here rather than at first connect.
            cfg.to_engine_config()?;
            let rendered = match output::render_structured(global.output, &cfg)? {
                Some(json) => json,
                None => cfg.to_toml()?,
            };
            output::print_output(rendered.trim_end());
            Ok(())
        }
        ConfigCommand::Path => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(astroviz_config::config_path);
            let path = path.display().to_string();
            let rendered =
                output::render_structured(global.output, &serde_json::json!({ "path": path }))?
                    .unwrap_or(path);
            output::print_output(&rendered);
            Ok(())
        }
    }
}
