// Status page catalogue
//
// Each page of the hotspot's web UI is described declaratively: the path
// it is served from and the layout of its root element's children. The
// generic extractor in `extract` walks a document against this layout.

use std::collections::BTreeMap;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::FieldError;
use crate::extract;

/// Fact name → fact value for one page fetch.
pub type FactMap = BTreeMap<String, String>;

/// How one child element of a page's root maps onto facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Element text copied verbatim under the element's own name.
    Scalar(&'static str),
    /// Comma-separated element text split into positional sub-facts.
    Composite {
        element: &'static str,
        facts: &'static [&'static str],
    },
}

impl Field {
    /// Source element name.
    pub fn element(&self) -> &'static str {
        match self {
            Self::Scalar(name) => name,
            Self::Composite { element, .. } => element,
        }
    }

    /// Fact names this field can emit.
    pub fn fact_names(&self) -> &[&'static str] {
        match self {
            Self::Scalar(name) => std::slice::from_ref(name),
            Self::Composite { facts, .. } => facts,
        }
    }
}

// Frequency record: the first four positions are undocumented by the
// firmware and kept under placeholder names.
const LTE_STATUS: &[Field] = &[
    Field::Scalar("cspn"),
    Field::Scalar("attach"),
    Field::Scalar("time"),
    Field::Scalar("apn"),
    Field::Composite {
        element: "freq_info",
        facts: &[
            "freq_info_unkn0",
            "freq_info_unkn1",
            "freq_info_unkn2",
            "freq_info_unkn3",
            "bandwidth",
            "earfcn",
            "band",
            "mode",
        ],
    },
    Field::Composite {
        element: "cell_node",
        facts: &["plmn", "global_cell_id", "phy_cell_id", "ecgi"],
    },
    Field::Composite {
        element: "rssi_info",
        facts: &["rsrp", "rsrq", "sinr", "rssi_info_unkn0"],
    },
];

// TODO: enumerate connected clients once a capture of the user list
// markup is available; only the count (`user_cnt`) is extracted today.
const LAN_INFO: &[Field] = &[
    Field::Scalar("ssid"),
    Field::Scalar("dhcp"),
    Field::Scalar("submask"),
    Field::Scalar("gate"),
    Field::Scalar("macaddr"),
    Field::Scalar("user_cnt"),
    Field::Scalar("ch"),
    Field::Scalar("channel"),
    Field::Scalar("wifi"),
    Field::Scalar("band_width"),
    Field::Scalar("enc_type"),
];

const WAN_INFO: &[Field] = &[
    Field::Scalar("t_tx"),
    Field::Scalar("t_rx"),
    Field::Scalar("plps"),
];

const DEV_DETAILS: &[Field] = &[
    Field::Scalar("dsc"),
    Field::Scalar("batt_per"),
    Field::Scalar("batt_st"),
];

const SYS_PERF: &[Field] = &[
    Field::Composite {
        element: "cpu",
        facts: &["cpu_usg_min", "cpu_usg_max"],
    },
    Field::Composite {
        element: "mem",
        facts: &["mem_usg_min", "mem_usg_max"],
    },
    Field::Scalar("curr_tx"),
    Field::Scalar("max_tx"),
    Field::Scalar("min_tx"),
    Field::Scalar("curr_rx"),
    Field::Scalar("max_rx"),
    Field::Scalar("min_rx"),
];

/// One status endpoint of the device.
///
/// The `snake_case` name doubles as the topic segment when publishing
/// (`<root>/<page>/<fact>`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Page {
    /// Radio/network attach state, frequency, cell identity, signal.
    LteStatus,
    /// WiFi access point and DHCP settings.
    LanInfo,
    /// Session traffic counters.
    WanInfo,
    /// Battery state.
    DevDetails,
    /// CPU, memory and throughput figures.
    SysPerf,
}

impl Page {
    /// All pages in polling order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Device-relative path of the page's XML document.
    pub fn path(self) -> &'static str {
        match self {
            Self::LteStatus => "st_lte.w.xml",
            Self::LanInfo => "st_lan.w.xml",
            Self::WanInfo => "st_wan.w.xml",
            Self::DevDetails => "st_dev.w.xml",
            Self::SysPerf => "st_per.w.xml",
        }
    }

    /// Topic segment / display name.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Child-element layout of the page's root.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::LteStatus => LTE_STATUS,
            Self::LanInfo => LAN_INFO,
            Self::WanInfo => WAN_INFO,
            Self::DevDetails => DEV_DETAILS,
            Self::SysPerf => SYS_PERF,
        }
    }

    /// The fixed vocabulary of fact names this page can produce.
    pub fn known_keys(self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .flat_map(Field::fact_names)
            .copied()
            .collect()
    }

    /// Extract this page's facts from a raw XML document.
    pub fn parse(self, xml: &str) -> PageFacts {
        extract::extract(self, xml)
    }
}

/// Whether the document yielded a root element to extract from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// The document parsed and had a root element.
    Available,
    /// Empty body, unparsable XML, or no root element.
    Unavailable,
}

/// Outcome of parsing one page document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFacts {
    pub page: Page,
    pub status: PageStatus,
    pub facts: FactMap,
    /// Composite fields skipped because they had too few values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub malformed: Vec<FieldError>,
}

impl PageFacts {
    /// An empty report for a page that yielded nothing.
    pub fn unavailable(page: Page) -> Self {
        Self {
            page,
            status: PageStatus::Unavailable,
            facts: FactMap::new(),
            malformed: Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == PageStatus::Available
    }

    /// Look up one fact by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.facts.get(key).map(String::as_str)
    }

    /// Consume the report, keeping only the fact mapping.
    pub fn into_facts(self) -> FactMap {
        self.facts
    }
}

/// Parse an LTE status document (`st_lte.w.xml`).
pub fn parse_lte_status(xml: &str) -> PageFacts {
    Page::LteStatus.parse(xml)
}

/// Parse a LAN info document (`st_lan.w.xml`).
pub fn parse_lan_info(xml: &str) -> PageFacts {
    Page::LanInfo.parse(xml)
}

/// Parse a WAN info document (`st_wan.w.xml`).
pub fn parse_wan_info(xml: &str) -> PageFacts {
    Page::WanInfo.parse(xml)
}

/// Parse a device details document (`st_dev.w.xml`).
pub fn parse_dev_details(xml: &str) -> PageFacts {
    Page::DevDetails.parse(xml)
}

/// Parse a system performance document (`st_per.w.xml`).
pub fn parse_sys_perf(xml: &str) -> PageFacts {
    Page::SysPerf.parse(xml)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use super::*;

    #[test]
    fn page_names_are_snake_case() {
        let names: Vec<&str> = Page::all().map(Page::name).collect();
        assert_eq!(
            names,
            ["lte_status", "lan_info", "wan_info", "dev_details", "sys_perf"]
        );
        assert_eq!(Page::SysPerf.to_string(), "sys_perf");
    }

    #[test]
    fn page_from_name() {
        assert_eq!(Page::from_str("wan_info").unwrap(), Page::WanInfo);
        assert!(Page::from_str("st_wan").is_err());
    }

    #[test]
    fn known_keys_are_unique_per_page() {
        for page in Page::all() {
            let keys = page.known_keys();
            let unique: HashSet<_> = keys.iter().collect();
            assert_eq!(keys.len(), unique.len(), "duplicate key on {page}");
        }
    }

    #[test]
    fn known_key_counts() {
        assert_eq!(Page::LteStatus.known_keys().len(), 20);
        assert_eq!(Page::LanInfo.known_keys().len(), 11);
        assert_eq!(Page::WanInfo.known_keys().len(), 3);
        assert_eq!(Page::DevDetails.known_keys().len(), 3);
        assert_eq!(Page::SysPerf.known_keys().len(), 10);
    }

    #[test]
    fn paths() {
        assert_eq!(Page::LteStatus.path(), "st_lte.w.xml");
        assert_eq!(Page::SysPerf.path(), "st_per.w.xml");
    }

    #[test]
    fn composite_field_exposes_all_sub_facts() {
        let field = Page::SysPerf.fields()[0];
        assert_eq!(field.element(), "cpu");
        assert_eq!(field.fact_names(), ["cpu_usg_min", "cpu_usg_max"]);
    }
}
