//! Space-heating system catalog.

use serde::{Deserialize, Serialize};

use crate::base::{BaseData, HasIdentifier};
use crate::hvac::hot_water::{FossilFuel, WoodFuel};

fn default_coverage() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingDirectElectric {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingFossilBoiler {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
    #[serde(default)]
    pub fuel: FossilFuel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingWoodBoiler {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
    #[serde(default)]
    pub fuel: WoodFuel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingDistrict {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HeatingSystem {
    HeatingDirectElectric(HeatingDirectElectric),
    HeatingFossilBoiler(HeatingFossilBoiler),
    HeatingWoodBoiler(HeatingWoodBoiler),
    HeatingDistrict(HeatingDistrict),
}

impl HeatingSystem {
    pub const KINDS: &'static [&'static str] = &[
        "HeatingDirectElectric",
        "HeatingFossilBoiler",
        "HeatingWoodBoiler",
        "HeatingDistrict",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            Self::HeatingDirectElectric(_) => "HeatingDirectElectric",
            Self::HeatingFossilBoiler(_) => "HeatingFossilBoiler",
            Self::HeatingWoodBoiler(_) => "HeatingWoodBoiler",
            Self::HeatingDistrict(_) => "HeatingDistrict",
        }
    }

    pub fn base(&self) -> &BaseData {
        match self {
            Self::HeatingDirectElectric(h) => &h.base,
            Self::HeatingFossilBoiler(h) => &h.base,
            Self::HeatingWoodBoiler(h) => &h.base,
            Self::HeatingDistrict(h) => &h.base,
        }
    }

    pub fn percent_coverage(&self) -> f64 {
        match self {
            Self::HeatingDirectElectric(h) => h.percent_coverage,
            Self::HeatingFossilBoiler(h) => h.percent_coverage,
            Self::HeatingWoodBoiler(h) => h.percent_coverage,
            Self::HeatingDistrict(h) => h.percent_coverage,
        }
    }
}

impl HasIdentifier for HeatingSystem {
    fn identifier(&self) -> &str {
        &self.base().identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serde() {
        let sys = HeatingSystem::HeatingFossilBoiler(HeatingFossilBoiler {
            base: BaseData::new("boiler"),
            percent_coverage: 0.8,
            fuel: FossilFuel::Oil,
        });
        let value = serde_json::to_value(&sys).unwrap();
        assert_eq!(value["type"], "HeatingFossilBoiler");
        assert_eq!(value["fuel"], "OIL");
        let back: HeatingSystem = serde_json::from_value(value).unwrap();
        assert_eq!(sys, back);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let value = serde_json::json!({
            "type": "HeatingFusionReactor",
            "identifier": "x",
            "display_name": "x",
            "user_data": {}
        });
        assert!(serde_json::from_value::<HeatingSystem>(value).is_err());
    }
}
