//! Configuration for the jiofly bridge and CLI.
//!
//! A single TOML file with `[device]`, `[mqtt]` and `[bridge]` sections,
//! layered as defaults → file → `JIOFLY_*` environment. The CLI applies
//! its own flag overrides on top of the loaded [`Config`].

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

use jiofly_api::{DEFAULT_DEVICE_URL, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

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

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceSettings,

    #[serde(default)]
    pub mqtt: MqttSettings,

    #[serde(default)]
    pub bridge: BridgeSettings,
}

/// Where the hotspot lives and how patiently to ask it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceSettings {
    /// Base URL of the status pages.
    #[serde(default = "default_device_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_device_timeout")]
    pub timeout: u64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            url: default_device_url(),
            timeout: default_device_timeout(),
        }
    }
}

fn default_device_url() -> String {
    DEFAULT_DEVICE_URL.into()
}
fn default_device_timeout() -> u64 {
    10
}

/// MQTT broker connection and topic layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MqttSettings {
    #[serde(default = "default_mqtt_host")]
    pub host: String,

    #[serde(default = "default_mqtt_port")]
    pub port: u16,

    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Facts are published under `<root_topic>/<page>/<fact>`.
    #[serde(default = "default_root_topic")]
    pub root_topic: String,

    /// 0 = at most once, 1 = at least once, 2 = exactly once.
    #[serde(default)]
    pub qos: u8,

    #[serde(default)]
    pub retain: bool,

    /// Keep-alive interval in seconds.
    #[serde(default = "default_keep_alive")]
    pub keep_alive: u64,

    pub username: Option<String>,

    pub password: Option<String>,
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            host: default_mqtt_host(),
            port: default_mqtt_port(),
            client_id: default_client_id(),
            root_topic: default_root_topic(),
            qos: 0,
            retain: false,
            keep_alive: default_keep_alive(),
            username: None,
            password: None,
        }
    }
}

fn default_mqtt_host() -> String {
    "localhost".into()
}
fn default_mqtt_port() -> u16 {
    1883
}
fn default_client_id() -> String {
    "jiofi-bridge".into()
}
fn default_root_topic() -> String {
    "home/devices/jiofi".into()
}
fn default_keep_alive() -> u64 {
    30
}

/// Poll loop tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BridgeSettings {
    /// Seconds between the start of consecutive ticks.
    #[serde(default = "default_interval")]
    pub interval: u64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            interval: default_interval(),
        }
    }
}

fn default_interval() -> u64 {
    30
}

impl Config {
    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.device_url()?;

        if self.device.timeout == 0 {
            return Err(invalid("device.timeout", "must be at least 1 second"));
        }
        if self.mqtt.host.trim().is_empty() {
            return Err(invalid("mqtt.host", "must not be empty"));
        }
        if self.mqtt.client_id.trim().is_empty() {
            return Err(invalid("mqtt.client_id", "must not be empty"));
        }
        if self.mqtt.root_topic.trim_matches('/').is_empty() {
            return Err(invalid("mqtt.root_topic", "must not be empty"));
        }
        if self.mqtt.root_topic.contains(['#', '+']) {
            return Err(invalid(
                "mqtt.root_topic",
                "wildcards are not allowed in publish topics",
            ));
        }
        if self.mqtt.qos > 2 {
            return Err(invalid(
                "mqtt.qos",
                &format!("expected 0, 1 or 2, got {}", self.mqtt.qos),
            ));
        }
        if self.bridge.interval == 0 {
            return Err(invalid("bridge.interval", "must be at least 1 second"));
        }
        Ok(())
    }

    /// Parsed device base URL.
    pub fn device_url(&self) -> Result<Url, ConfigError> {
        self.device
            .url
            .parse()
            .map_err(|e| invalid("device.url", &format!("{e}: {}", self.device.url)))
    }

    /// HTTP transport settings for the device client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(Duration::from_secs(self.device.timeout))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.bridge.interval)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "jiofly", "jiofly").map_or_else(
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
    p.push("jiofly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + environment.
///
/// A missing file is not an error; defaults and `JIOFLY_*` variables
/// still apply. Nested keys use a double underscore, e.g.
/// `JIOFLY_MQTT__HOST=broker.lan`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("JIOFLY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}
