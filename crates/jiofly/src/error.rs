//! CLI error types with miette diagnostics.
//!
//! Maps device, broker and configuration failures into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use jiofly_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CONFIG: i32 = 9;
    pub const BROKER: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Device ───────────────────────────────────────────────────────

    #[error("Could not reach the device at {url}")]
    #[diagnostic(
        code(jiofly::connection_failed),
        help(
            "Check that this machine is connected to the hotspot's WiFi.\n\
             Try the gateway address directly: jiofly show --device http://192.168.225.1/"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Device returned HTTP {status} for {url}")]
    #[diagnostic(
        code(jiofly::device_status),
        help("The page path may differ on this firmware. Run: jiofly pages")
    )]
    DeviceStatus { status: u16, url: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(jiofly::timeout),
        help("Increase the timeout with --timeout or [device] timeout in the config file.")
    )]
    Timeout,

    // ── Broker ───────────────────────────────────────────────────────

    #[error("MQTT broker error: {message}")]
    #[diagnostic(
        code(jiofly::broker),
        help("Check [mqtt] host and port, or override with --broker-host / --broker-port.")
    )]
    Broker { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(jiofly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(jiofly::config_exists),
        help("Edit it directly, or rerun with --force to overwrite it with defaults.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(jiofly::config),
        help("Run: jiofly config path   to locate the file being read.")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::DeviceStatus { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Broker { .. } => exit_code::BROKER,
            Self::Validation { .. } | Self::Config(ConfigError::Validation { .. }) => {
                exit_code::USAGE
            }
            Self::Config(_) | Self::ConfigExists { .. } => exit_code::CONFIG,
            Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── jiofly_api::Error → CliError mapping ─────────────────────────────

impl CliError {
    /// Attach the device URL to a fetch failure.
    pub fn from_device(err: jiofly_api::Error, url: &str) -> Self {
        match err {
            jiofly_api::Error::Transport(e) if e.is_timeout() => Self::Timeout,
            jiofly_api::Error::Transport(e) => Self::ConnectionFailed {
                url: url.into(),
                source: Box::new(e),
            },
            jiofly_api::Error::Status { status, url } => Self::DeviceStatus { status, url },
            jiofly_api::Error::InvalidUrl(e) => Self::Validation {
                field: "device".into(),
                reason: e.to_string(),
            },
            jiofly_api::Error::Client(message) => Self::ConnectionFailed {
                url: url.into(),
                source: message.into(),
            },
        }
    }
}
