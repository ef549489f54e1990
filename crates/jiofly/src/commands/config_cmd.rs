//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

const MASK: &str = "********";

/// Effective config with the broker password hidden.
fn redacted(mut cfg: Config) -> Config {
    if cfg.mqtt.password.is_some() {
        cfg.mqtt.password = Some(MASK.into());
    }
    cfg
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = redacted(config::resolve(global)?);
            let out = match global.output {
                OutputFormat::Json => serde_json::to_string_pretty(&cfg).map_err(serialize_err)?,
                OutputFormat::JsonCompact => serde_json::to_string(&cfg).map_err(serialize_err)?,
                OutputFormat::Yaml => serde_yaml::to_string(&cfg).map_err(serialize_err)?,
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&cfg).map_err(serialize_err)?
                }
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = config::active_config_path(global);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::active_config_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            config::save_config_to(&Config::default(), &path)?;
            if !global.quiet {
                eprintln!("Wrote default configuration to {}", path.display());
            }
            Ok(())
        }
    }
}

fn serialize_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "config".into(),
        reason: format!("failed to serialize config: {e}"),
    }
}
