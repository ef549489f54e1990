// Device HTTP client
//
// Wraps `reqwest::Client` with status-page URL construction. Every page
// accessor is an independent fetch-then-parse; there is no session,
// retry, or cache.

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::page::{Page, PageFacts};
use crate::transport::TransportConfig;

/// Address the hotspot answers on when reached through its own WiFi.
pub const DEFAULT_DEVICE_URL: &str = "http://jiofi.local.html/";

/// Client for one hotspot's status pages.
///
/// Holds only the base URL and a reusable HTTP client, so a single
/// instance can be shared across tasks and polled repeatedly.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DeviceClient {
    /// Create a client for the device at `base_url`.
    ///
    /// A base URL without a trailing slash is treated as a directory, so
    /// `http://192.168.225.1` and `http://192.168.225.1/` are equivalent.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client for the default device address.
    pub fn default_device(transport: &TransportConfig) -> Result<Self, Error> {
        Self::new(Url::parse(DEFAULT_DEVICE_URL)?, transport)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of a page's XML document.
    pub fn page_url(&self, page: Page) -> Result<Url, Error> {
        Ok(self.base_url.join(page.path())?)
    }

    /// Fetch a page's raw XML body.
    ///
    /// `GET {base}/{page.path()}`
    pub async fn fetch_page(&self, page: Page) -> Result<String, Error> {
        let url = self.page_url(page)?;
        debug!("GET {}", url);

        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await?;
        debug!(%page, bytes = body.len(), "page fetched");
        Ok(body)
    }

    /// Fetch and parse any page.
    pub async fn page(&self, page: Page) -> Result<PageFacts, Error> {
        let body = self.fetch_page(page).await?;
        Ok(page.parse(&body))
    }

    /// LTE attach state, frequency record, cell identity and signal.
    ///
    /// `GET st_lte.w.xml`
    pub async fn lte_status(&self) -> Result<PageFacts, Error> {
        self.page(Page::LteStatus).await
    }

    /// WiFi access point, DHCP and associated-user count.
    ///
    /// `GET st_lan.w.xml`
    pub async fn lan_info(&self) -> Result<PageFacts, Error> {
        self.page(Page::LanInfo).await
    }

    /// Session uplink/downlink totals and packet loss.
    ///
    /// `GET st_wan.w.xml`
    pub async fn wan_info(&self) -> Result<PageFacts, Error> {
        self.page(Page::WanInfo).await
    }

    /// Battery descriptor, percentage and charging state.
    ///
    /// `GET st_dev.w.xml`
    pub async fn dev_details(&self) -> Result<PageFacts, Error> {
        self.page(Page::DevDetails).await
    }

    /// CPU and memory usage ranges, current/min/max throughput.
    ///
    /// `GET st_per.w.xml`
    pub async fn sys_perf(&self) -> Result<PageFacts, Error> {
        self.page(Page::SysPerf).await
    }
}
