// jiofly-api: JioFi hotspot status pages as flat fact maps
//
// `DeviceClient` fetches a page, `Page::parse` turns its XML into named
// facts. The parsers are pure and usable without the client.

pub mod client;
pub mod csv;
pub mod error;
mod extract;
pub mod page;
pub mod transport;

pub use client::{DEFAULT_DEVICE_URL, DeviceClient};
pub use error::{Error, FieldError};
pub use page::{
    FactMap, Field, Page, PageFacts, PageStatus, parse_dev_details, parse_lan_info,
    parse_lte_status, parse_sys_perf, parse_wan_info,
};
pub use transport::TransportConfig;
