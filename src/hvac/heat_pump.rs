//! Heat-pump system catalog.

use serde::{Deserialize, Serialize};

use crate::base::{BaseData, HasIdentifier};

fn default_coverage() -> f64 {
    1.0
}

/// Heat pump rated by a single annual COP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPumpAnnual {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
    pub annual_cop: f64,
}

/// Heat pump rated at two (COP, ambient temperature) points, from
/// which monthly performance is interpolated downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPumpMonthly {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
    pub cop_1: f64,
    pub ambient_temp_1: f64,
    pub cop_2: f64,
    pub ambient_temp_2: f64,
}

/// Combined heating/hot-water heat pump. The schema reserves the slot;
/// it parses and round-trips but carries no rating parameters yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPumpCombined {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HeatPumpSystem {
    HeatPumpAnnual(HeatPumpAnnual),
    HeatPumpMonthly(HeatPumpMonthly),
    HeatPumpCombined(HeatPumpCombined),
}

impl HeatPumpSystem {
    pub const KINDS: &'static [&'static str] =
        &["HeatPumpAnnual", "HeatPumpMonthly", "HeatPumpCombined"];

    pub fn kind(&self) -> &'static str {
        match self {
            Self::HeatPumpAnnual(_) => "HeatPumpAnnual",
            Self::HeatPumpMonthly(_) => "HeatPumpMonthly",
            Self::HeatPumpCombined(_) => "HeatPumpCombined",
        }
    }

    pub fn base(&self) -> &BaseData {
        match self {
            Self::HeatPumpAnnual(h) => &h.base,
            Self::HeatPumpMonthly(h) => &h.base,
            Self::HeatPumpCombined(h) => &h.base,
        }
    }

    pub fn percent_coverage(&self) -> f64 {
        match self {
            Self::HeatPumpAnnual(h) => h.percent_coverage,
            Self::HeatPumpMonthly(h) => h.percent_coverage,
            Self::HeatPumpCombined(h) => h.percent_coverage,
        }
    }
}

impl HasIdentifier for HeatPumpSystem {
    fn identifier(&self) -> &str {
        &self.base().identifier
    }
}
