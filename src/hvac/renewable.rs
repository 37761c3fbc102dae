//! On-site renewable energy devices.

use serde::{Deserialize, Serialize};

use crate::base::{BaseData, HasIdentifier};

fn default_utilization() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photovoltaic {
    #[serde(flatten)]
    pub base: BaseData,
    /// Array size in m2.
    #[serde(default)]
    pub array_size_m2: f64,
    /// Fraction of the yield used on site, 0..1.
    #[serde(default = "default_utilization")]
    pub utilization_factor: f64,
    /// Annual yield in kWh.
    #[serde(default)]
    pub annual_yield_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RenewableDevice {
    Photovoltaic(Photovoltaic),
}

impl RenewableDevice {
    pub const KINDS: &'static [&'static str] = &["Photovoltaic"];

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Photovoltaic(_) => "Photovoltaic",
        }
    }

    pub fn base(&self) -> &BaseData {
        match self {
            Self::Photovoltaic(d) => &d.base,
        }
    }
}

impl HasIdentifier for RenewableDevice {
    fn identifier(&self) -> &str {
        &self.base().identifier
    }
}
