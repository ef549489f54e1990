//! CLI configuration: a thin wrapper around `jiofly_config` shared types.
//!
//! Adds the resolution step that layers `GlobalOpts` / `BridgeArgs` flag
//! overrides (--device, --timeout, --broker-host, ...) on top of the
//! file + environment config.

use std::path::PathBuf;

use crate::cli::{BridgeArgs, GlobalOpts};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use jiofly_config::{Config, config_path, load_config_from, save_config_to};

// ── CLI-specific helpers ────────────────────────────────────────────

/// The config file in effect: `--config` / `JIOFLY_CONFIG`, else the
/// platform default.
pub fn active_config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load the config and apply global flag overrides.
///
/// CLI flag overrides take priority over file and environment values.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config_from(&active_config_path(global))?;

    if let Some(ref url) = global.device {
        cfg.device.url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.device.timeout = timeout;
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Apply `bridge` subcommand overrides on top of a resolved config.
pub fn apply_bridge_overrides(mut cfg: Config, args: &BridgeArgs) -> Result<Config, CliError> {
    if let Some(ref host) = args.broker_host {
        cfg.mqtt.host.clone_from(host);
    }
    if let Some(port) = args.broker_port {
        cfg.mqtt.port = port;
    }
    if let Some(ref topic) = args.root_topic {
        cfg.mqtt.root_topic.clone_from(topic);
    }
    if let Some(interval) = args.interval {
        cfg.bridge.interval = interval;
    }

    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::{ColorMode, OutputFormat};

    fn global(config: PathBuf) -> GlobalOpts {
        GlobalOpts {
            config: Some(config),
            device: None,
            timeout: None,
            output: OutputFormat::Table,
            color: ColorMode::Never,
            verbose: 0,
            quiet: false,
        }
    }

    fn bridge_args() -> BridgeArgs {
        BridgeArgs {
            broker_host: None,
            broker_port: None,
            root_topic: None,
            interval: None,
            once: false,
        }
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[device]\nurl = \"http://10.0.0.1/\"\ntimeout = 20\n").unwrap();

        let mut opts = global(path);
        opts.device = Some("http://192.168.225.1/".into());

        let cfg = resolve(&opts).unwrap();
        assert_eq!(cfg.device.url, "http://192.168.225.1/");
        assert_eq!(cfg.device.timeout, 20);
    }

    #[test]
    fn invalid_device_flag_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = global(dir.path().join("absent.toml"));
        opts.device = Some("::nope::".into());

        let err = resolve(&opts).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn bridge_overrides() {
        let mut args = bridge_args();
        args.broker_host = Some("broker.lan".into());
        args.root_topic = Some("lab/jiofi".into());
        args.interval = Some(5);

        let cfg = apply_bridge_overrides(Config::default(), &args).unwrap();
        assert_eq!(cfg.mqtt.host, "broker.lan");
        assert_eq!(cfg.mqtt.port, 1883);
        assert_eq!(cfg.mqtt.root_topic, "lab/jiofi");
        assert_eq!(cfg.bridge.interval, 5);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut args = bridge_args();
        args.interval = Some(0);
        assert!(apply_bridge_overrides(Config::default(), &args).is_err());
    }
}
