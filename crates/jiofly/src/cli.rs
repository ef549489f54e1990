//! Clap derive structures for the `jiofly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// jiofly -- JioFi hotspot status to MQTT bridge
#[derive(Debug, Parser)]
#[command(
    name = "jiofly",
    version,
    about = "Poll a JioFi hotspot's status pages and publish them to MQTT",
    long_about = "Reads the XML status pages served by a JioFi hotspot (LTE, LAN, WAN,\n\
        battery, system performance), flattens them into named facts, and\n\
        publishes each fact as <root>/<page>/<fact> on an MQTT broker.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "JIOFLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Device base URL (overrides config)
    #[arg(long, short = 'd', env = "JIOFLY_DEVICE_URL", global = true)]
    pub device: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "JIOFLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "JIOFLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain `page/fact value` lines (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Pages ────────────────────────────────────────────────────────────

/// A device status page, named as in published topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum PageArg {
    /// LTE attach, frequency, cell and signal (st_lte.w.xml)
    #[value(alias = "lte")]
    LteStatus,
    /// WiFi and DHCP settings (st_lan.w.xml)
    #[value(alias = "lan")]
    LanInfo,
    /// Session traffic counters (st_wan.w.xml)
    #[value(alias = "wan")]
    WanInfo,
    /// Battery state (st_dev.w.xml)
    #[value(alias = "dev")]
    DevDetails,
    /// CPU, memory and throughput (st_per.w.xml)
    #[value(alias = "perf")]
    SysPerf,
}

/// A single page, or every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum PageSelector {
    /// All five pages, in polling order
    All,
    #[value(alias = "lte")]
    LteStatus,
    #[value(alias = "lan")]
    LanInfo,
    #[value(alias = "wan")]
    WanInfo,
    #[value(alias = "dev")]
    DevDetails,
    #[value(alias = "perf")]
    SysPerf,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll the device and publish facts to MQTT until interrupted
    #[command(alias = "run")]
    Bridge(BridgeArgs),

    /// Fetch pages once and print their facts
    #[command(alias = "get")]
    Show(ShowArgs),

    /// Parse a saved page document without contacting the device
    Parse(ParseArgs),

    /// List the status pages and the facts each can produce
    Pages,

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Bridge ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BridgeArgs {
    /// MQTT broker host (overrides config)
    #[arg(long, env = "JIOFLY_BROKER_HOST")]
    pub broker_host: Option<String>,

    /// MQTT broker port (overrides config)
    #[arg(long, env = "JIOFLY_BROKER_PORT")]
    pub broker_port: Option<u16>,

    /// Root topic for published facts (overrides config)
    #[arg(long, env = "JIOFLY_ROOT_TOPIC")]
    pub root_topic: Option<String>,

    /// Seconds between polls (overrides config)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Run a single tick, then disconnect and exit
    #[arg(long)]
    pub once: bool,
}

// ── Show / Parse ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Page to fetch
    #[arg(default_value = "all")]
    pub page: PageSelector,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Layout to apply
    pub page: PageArg,

    /// XML file to parse (`-` reads stdin)
    pub file: PathBuf,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file + env + flags)
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
