//! Command handlers: CLI args -> device / parser calls -> output formatting.

pub mod bridge;
pub mod config_cmd;
pub mod pages;
pub mod parse;
pub mod show;

use jiofly_api::{DeviceClient, Page};
use jiofly_config::Config;

use crate::cli::{PageArg, PageSelector};
use crate::error::CliError;

/// Build the device client for a resolved config.
pub fn device_client(cfg: &Config) -> Result<DeviceClient, CliError> {
    let url = cfg.device_url()?;
    DeviceClient::new(url, &cfg.transport()).map_err(|e| CliError::from_device(e, &cfg.device.url))
}

impl From<PageArg> for Page {
    fn from(arg: PageArg) -> Self {
        match arg {
            PageArg::LteStatus => Self::LteStatus,
            PageArg::LanInfo => Self::LanInfo,
            PageArg::WanInfo => Self::WanInfo,
            PageArg::DevDetails => Self::DevDetails,
            PageArg::SysPerf => Self::SysPerf,
        }
    }
}

impl PageSelector {
    /// Pages to visit, in polling order.
    pub fn pages(self) -> Vec<Page> {
        match self {
            Self::All => Page::all().collect(),
            Self::LteStatus => vec![Page::LteStatus],
            Self::LanInfo => vec![Page::LanInfo],
            Self::WanInfo => vec![Page::WanInfo],
            Self::DevDetails => vec![Page::DevDetails],
            Self::SysPerf => vec![Page::SysPerf],
        }
    }
}
