//! Passive House certification targets and the building segment that
//! ties rooms to a site and a certification block.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};
use crate::climate::Site;

fn default_demand() -> f64 {
    15.0
}

fn default_peak_load() -> f64 {
    10.0
}

fn default_code_one() -> i32 {
    1
}

/// PHIUS certification thresholds and status codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhiusCertification {
    #[serde(flatten)]
    pub base: BaseData,
    /// Annual heating demand target, kWh/m2.
    #[serde(default = "default_demand")]
    pub annual_heating_demand: f64,
    /// Annual cooling demand target, kWh/m2.
    #[serde(default = "default_demand")]
    pub annual_cooling_demand: f64,
    /// Peak heating load target, W/m2.
    #[serde(default = "default_peak_load")]
    pub peak_heating_load: f64,
    /// Peak cooling load target, W/m2.
    #[serde(default = "default_peak_load")]
    pub peak_cooling_load: f64,
    /// WUFI building-status code (1 = in planning).
    #[serde(default = "default_code_one")]
    pub building_status: i32,
    /// WUFI building-type code (1 = new construction).
    #[serde(default = "default_code_one")]
    pub building_type: i32,
    /// WUFI certification-program code.
    #[serde(default = "default_code_one")]
    pub certification_program: i32,
}

impl PhiusCertification {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            annual_heating_demand: 15.0,
            annual_cooling_demand: 15.0,
            peak_heating_load: 10.0,
            peak_cooling_load: 10.0,
            building_status: 1,
            building_type: 1,
            certification_program: 1,
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            ..self.clone()
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "PhiusCertification")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "PhiusCertification")
    }
}

impl HasIdentifier for PhiusCertification {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

fn default_setpoint_winter() -> f64 {
    20.0
}

fn default_setpoint_summer() -> f64 {
    25.0
}

/// A building segment: the certification unit rooms belong to. One
/// WUFI variant is written per segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSegment {
    #[serde(flatten)]
    pub base: BaseData,
    /// WUFI usage-type code (1 = residential).
    #[serde(default = "default_code_one")]
    pub usage_type: i32,
    #[serde(default = "default_code_one")]
    pub num_floor_levels: i32,
    #[serde(default = "default_code_one")]
    pub num_dwelling_units: i32,
    #[serde(default = "default_setpoint_winter")]
    pub setpoint_winter_c: f64,
    #[serde(default = "default_setpoint_summer")]
    pub setpoint_summer_c: f64,
    #[serde(default)]
    pub non_combustible_materials: bool,
    pub site: Site,
    pub phius_certification: PhiusCertification,
}

impl BuildingSegment {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            usage_type: 1,
            num_floor_levels: 1,
            num_dwelling_units: 1,
            setpoint_winter_c: 20.0,
            setpoint_summer_c: 25.0,
            non_combustible_materials: false,
            site: Site::new(display_name),
            phius_certification: PhiusCertification::new(display_name),
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            site: self.site.duplicate(),
            phius_certification: self.phius_certification.duplicate(),
            ..self.clone()
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "BuildingSegment")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "BuildingSegment")
    }
}

impl HasIdentifier for BuildingSegment {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certification_defaults() {
        let cert = PhiusCertification::new("phius 2021");
        assert!((cert.annual_heating_demand - 15.0).abs() < 1e-9);
        assert!((cert.peak_cooling_load - 10.0).abs() < 1e-9);
        assert_eq!(cert.building_status, 1);
    }

    #[test]
    fn test_segment_round_trip() {
        let mut seg = BuildingSegment::new("residence");
        seg.num_floor_levels = 3;
        seg.setpoint_winter_c = 21.0;
        let value = seg.to_dict().unwrap();
        assert_eq!(value["type"], "BuildingSegment");
        let back = BuildingSegment::from_dict(&value).unwrap();
        assert_eq!(seg, back);
    }
}
