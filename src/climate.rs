//! Site and climate data copied into the WUFI project: location,
//! ground properties, monthly climate arrays and peak design days.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};

fn default_latitude() -> f64 {
    40.6
}

fn default_longitude() -> f64 {
    -73.8
}

fn default_hours_from_utc() -> i32 {
    -4
}

fn default_daylight_saving() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default)]
    pub site_elevation_m: Option<f64>,
    #[serde(default = "default_hours_from_utc")]
    pub hours_from_utc: i32,
    #[serde(default = "default_daylight_saving")]
    pub daylight_saving_period: i32,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            latitude: 40.6,
            longitude: -73.8,
            site_elevation_m: None,
            hours_from_utc: -4,
            daylight_saving_period: 1,
        }
    }
}

fn default_ground_conductivity() -> f64 {
    2.0
}

fn default_ground_heat_capacity() -> f64 {
    1000.0
}

fn default_ground_density() -> f64 {
    2000.0
}

fn default_groundwater_depth() -> f64 {
    3.0
}

fn default_groundwater_flow() -> f64 {
    0.05
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    #[serde(default = "default_ground_conductivity")]
    pub thermal_conductivity: f64,
    #[serde(default = "default_ground_heat_capacity")]
    pub heat_capacity: f64,
    #[serde(default = "default_ground_density")]
    pub density: f64,
    #[serde(default = "default_groundwater_depth")]
    pub depth_groundwater: f64,
    #[serde(default = "default_groundwater_flow")]
    pub flow_rate_groundwater: f64,
}

impl Default for Ground {
    fn default() -> Self {
        Self {
            thermal_conductivity: 2.0,
            heat_capacity: 1000.0,
            density: 2000.0,
            depth_groundwater: 3.0,
            flow_rate_groundwater: 0.05,
        }
    }
}

fn zeros() -> [f64; 12] {
    [0.0; 12]
}

/// Twelve-month climate arrays, January first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyClimate {
    #[serde(default = "zeros")]
    pub air_temps: [f64; 12],
    #[serde(default = "zeros")]
    pub dew_points: [f64; 12],
    #[serde(default = "zeros")]
    pub sky_temps: [f64; 12],
    /// Monthly solar radiation on the five WUFI orientations, kWh/m2.
    #[serde(default = "zeros")]
    pub radiation_north: [f64; 12],
    #[serde(default = "zeros")]
    pub radiation_east: [f64; 12],
    #[serde(default = "zeros")]
    pub radiation_south: [f64; 12],
    #[serde(default = "zeros")]
    pub radiation_west: [f64; 12],
    #[serde(default = "zeros")]
    pub radiation_global: [f64; 12],
}

impl Default for MonthlyClimate {
    fn default() -> Self {
        Self {
            air_temps: [0.0; 12],
            dew_points: [0.0; 12],
            sky_temps: [0.0; 12],
            radiation_north: [0.0; 12],
            radiation_east: [0.0; 12],
            radiation_south: [0.0; 12],
            radiation_west: [0.0; 12],
            radiation_global: [0.0; 12],
        }
    }
}

/// One peak-load design day: air temperature plus radiation on the
/// five orientations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PeakLoadDay {
    pub temp: f64,
    pub radiation_north: f64,
    pub radiation_east: f64,
    pub radiation_south: f64,
    pub radiation_west: f64,
    pub radiation_global: f64,
}

/// The 2+2 peak design days WUFI expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PeakLoads {
    pub heating_1: PeakLoadDay,
    pub heating_2: PeakLoadDay,
    pub cooling_1: PeakLoadDay,
    pub cooling_2: PeakLoadDay,
}

/// Everything the translator needs to describe the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub ground: Ground,
    #[serde(default)]
    pub climate: MonthlyClimate,
    #[serde(default)]
    pub peak_loads: PeakLoads,
}

impl Site {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            location: Location::default(),
            ground: Ground::default(),
            climate: MonthlyClimate::default(),
            peak_loads: PeakLoads::default(),
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            ..self.clone()
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "Site")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "Site")
    }
}

impl HasIdentifier for Site {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}
