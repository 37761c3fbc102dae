//! Service hot-water systems: storage tanks, heaters and the piping
//! they feed.

use std::ops;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};
use crate::hvac::piping::{
    PipeElement, PipeTrunk, DEFAULT_DAILY_PERIOD_H, DEFAULT_WATER_TEMP_C,
};
use crate::hvac::union_by_identifier;

fn default_quantity() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_storage_capacity() -> f64 {
    300.0
}

fn default_standby_losses() -> f64 {
    4.0
}

fn default_room_temp() -> f64 {
    20.0
}

fn default_water_temp() -> f64 {
    DEFAULT_WATER_TEMP_C
}

/// A hot-water storage tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotWaterTank {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    /// Storage volume in litres.
    #[serde(default = "default_storage_capacity")]
    pub storage_capacity_l: f64,
    /// Standby heat loss in W/K.
    #[serde(default = "default_standby_losses")]
    pub standby_losses_w_k: f64,
    #[serde(default = "default_true")]
    pub in_conditioned_space: bool,
    #[serde(default = "default_room_temp")]
    pub room_temp_c: f64,
    #[serde(default = "default_water_temp")]
    pub water_temp_c: f64,
}

impl HotWaterTank {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            quantity: 1,
            storage_capacity_l: 300.0,
            standby_losses_w_k: 4.0,
            in_conditioned_space: true,
            room_temp_c: 20.0,
            water_temp_c: DEFAULT_WATER_TEMP_C,
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            ..self.clone()
        }
    }
}

impl HasIdentifier for HotWaterTank {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

fn default_coverage() -> f64 {
    1.0
}

/// Fossil fuel burned by a boiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FossilFuel {
    NaturalGas,
    Oil,
}

impl Default for FossilFuel {
    fn default() -> Self {
        Self::NaturalGas
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WoodFuel {
    Logs,
    Pellets,
}

impl Default for WoodFuel {
    fn default() -> Self {
        Self::Logs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterElectric {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterBoiler {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
    #[serde(default)]
    pub fuel: FossilFuel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterBoilerWood {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
    #[serde(default)]
    pub fuel: WoodFuel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterDistrict {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterHeatPumpAnnual {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
    pub annual_cop: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_system_perf_ratio: Option<f64>,
}

/// Heat pump rated at two (COP, ambient temperature) points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterHeatPumpMonthly {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
    pub cop_1: f64,
    pub ambient_temp_1: f64,
    pub cop_2: f64,
    pub ambient_temp_2: f64,
}

/// Heat pump drawing from interior air.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterHeatPumpInterior {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_coverage")]
    pub percent_coverage: f64,
    pub annual_cop: f64,
}

/// The hot-water heater catalog. The serialized form carries the
/// variant struct name in a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HotWaterHeater {
    HeaterElectric(HeaterElectric),
    HeaterBoiler(HeaterBoiler),
    HeaterBoilerWood(HeaterBoilerWood),
    HeaterDistrict(HeaterDistrict),
    HeaterHeatPumpAnnual(HeaterHeatPumpAnnual),
    HeaterHeatPumpMonthly(HeaterHeatPumpMonthly),
    HeaterHeatPumpInterior(HeaterHeatPumpInterior),
}

impl HotWaterHeater {
    pub const KINDS: &'static [&'static str] = &[
        "HeaterElectric",
        "HeaterBoiler",
        "HeaterBoilerWood",
        "HeaterDistrict",
        "HeaterHeatPumpAnnual",
        "HeaterHeatPumpMonthly",
        "HeaterHeatPumpInterior",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            Self::HeaterElectric(_) => "HeaterElectric",
            Self::HeaterBoiler(_) => "HeaterBoiler",
            Self::HeaterBoilerWood(_) => "HeaterBoilerWood",
            Self::HeaterDistrict(_) => "HeaterDistrict",
            Self::HeaterHeatPumpAnnual(_) => "HeaterHeatPumpAnnual",
            Self::HeaterHeatPumpMonthly(_) => "HeaterHeatPumpMonthly",
            Self::HeaterHeatPumpInterior(_) => "HeaterHeatPumpInterior",
        }
    }

    pub fn base(&self) -> &BaseData {
        match self {
            Self::HeaterElectric(h) => &h.base,
            Self::HeaterBoiler(h) => &h.base,
            Self::HeaterBoilerWood(h) => &h.base,
            Self::HeaterDistrict(h) => &h.base,
            Self::HeaterHeatPumpAnnual(h) => &h.base,
            Self::HeaterHeatPumpMonthly(h) => &h.base,
            Self::HeaterHeatPumpInterior(h) => &h.base,
        }
    }

    pub fn percent_coverage(&self) -> f64 {
        match self {
            Self::HeaterElectric(h) => h.percent_coverage,
            Self::HeaterBoiler(h) => h.percent_coverage,
            Self::HeaterBoilerWood(h) => h.percent_coverage,
            Self::HeaterDistrict(h) => h.percent_coverage,
            Self::HeaterHeatPumpAnnual(h) => h.percent_coverage,
            Self::HeaterHeatPumpMonthly(h) => h.percent_coverage,
            Self::HeaterHeatPumpInterior(h) => h.percent_coverage,
        }
    }
}

impl HasIdentifier for HotWaterHeater {
    fn identifier(&self) -> &str {
        &self.base().identifier
    }
}

fn default_recirc_calc_method() -> i32 {
    4
}

fn default_fixture_calc_method() -> i32 {
    1
}

/// A complete service hot-water system: tanks, heaters, distribution
/// trunks and recirculation loops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotWaterSystem {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_primary: Option<HotWaterTank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_secondary: Option<HotWaterTank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_buffer: Option<HotWaterTank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_solar: Option<HotWaterTank>,
    #[serde(default)]
    pub heaters: Vec<HotWaterHeater>,
    #[serde(default)]
    pub distribution_piping: Vec<PipeTrunk>,
    #[serde(default)]
    pub recirc_piping: Vec<PipeElement>,
    /// Explicit tap-point count. When unset the count is derived from
    /// the fixtures of the distribution piping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_tap_points: Option<i32>,
    /// WUFI recirculation calculation-method code.
    #[serde(default = "default_recirc_calc_method")]
    pub recirc_calc_method: i32,
    /// WUFI tap-point calculation-method code.
    #[serde(default = "default_fixture_calc_method")]
    pub fixture_calc_method: i32,
}

impl HotWaterSystem {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            tank_primary: None,
            tank_secondary: None,
            tank_buffer: None,
            tank_solar: None,
            heaters: Vec::new(),
            distribution_piping: Vec::new(),
            recirc_piping: Vec::new(),
            number_tap_points: None,
            recirc_calc_method: 4,
            fixture_calc_method: 1,
        }
    }

    pub fn add_heater(&mut self, heater: HotWaterHeater) {
        self.heaters.push(heater);
    }

    /// Adds distribution piping at whatever level it was modelled:
    /// a trunk directly, or a branch / fixture element wrapped into
    /// synthetic zero-length parents.
    pub fn add_distribution_piping(&mut self, piping: impl Into<PipeTrunk>) {
        self.distribution_piping.push(piping.into());
    }

    pub fn add_recirc_piping(&mut self, element: PipeElement) {
        self.recirc_piping.push(element);
    }

    pub fn tanks(&self) -> Vec<&HotWaterTank> {
        [
            self.tank_primary.as_ref(),
            self.tank_secondary.as_ref(),
            self.tank_buffer.as_ref(),
            self.tank_solar.as_ref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn total_distribution_length(&self) -> f64 {
        self.distribution_piping
            .iter()
            .map(PipeTrunk::total_length)
            .sum()
    }

    pub fn total_home_run_fixture_length(&self) -> f64 {
        self.distribution_piping
            .iter()
            .map(PipeTrunk::total_home_run_fixture_length)
            .sum()
    }

    pub fn total_recirc_length(&self) -> f64 {
        self.recirc_piping.iter().map(PipeElement::length).sum()
    }

    /// Length-weighted recirculation water temperature over all
    /// recirculation elements, 60 degC when there is no loop.
    pub fn recirc_temp(&self) -> f64 {
        self.recirc_weighted(PipeElement::water_temp_c, DEFAULT_WATER_TEMP_C)
    }

    /// Length-weighted recirculation operating hours per day, 24 h
    /// when there is no loop.
    pub fn recirc_hours(&self) -> f64 {
        self.recirc_weighted(PipeElement::daily_period, DEFAULT_DAILY_PERIOD_H)
    }

    fn recirc_weighted(&self, value: impl Fn(&PipeElement) -> f64, default: f64) -> f64 {
        let total = self.total_recirc_length();
        if total <= 0.0 {
            return default;
        }
        let weighted: f64 = self
            .recirc_piping
            .iter()
            .map(|e| e.length() * value(e))
            .sum();
        weighted / total
    }

    /// Number of tap points: the explicit count when set, otherwise
    /// the number of fixtures across the distribution piping.
    pub fn number_tap_points(&self) -> i32 {
        match self.number_tap_points {
            Some(n) => n,
            None => self
                .distribution_piping
                .iter()
                .map(|t| t.num_fixtures() as i32)
                .sum(),
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            tank_primary: self.tank_primary.as_ref().map(HotWaterTank::duplicate),
            tank_secondary: self.tank_secondary.as_ref().map(HotWaterTank::duplicate),
            tank_buffer: self.tank_buffer.as_ref().map(HotWaterTank::duplicate),
            tank_solar: self.tank_solar.as_ref().map(HotWaterTank::duplicate),
            ..self.clone()
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "HotWaterSystem")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "HotWaterSystem")
    }
}

impl HasIdentifier for HotWaterSystem {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

/// Combines two systems. Tanks come from the left operand; heater,
/// trunk and recirculation sets are unioned by identifier. The tap
/// count stays explicit (as the sum of both sides) if either operand
/// carried an explicit count, and otherwise remains derived.
impl ops::Add for HotWaterSystem {
    type Output = HotWaterSystem;

    fn add(self, rhs: HotWaterSystem) -> HotWaterSystem {
        let number_tap_points = if self.number_tap_points.is_some() || rhs.number_tap_points.is_some()
        {
            Some(self.number_tap_points() + rhs.number_tap_points())
        } else {
            None
        };
        HotWaterSystem {
            heaters: union_by_identifier(self.heaters.clone(), rhs.heaters),
            distribution_piping: union_by_identifier(
                self.distribution_piping.clone(),
                rhs.distribution_piping,
            ),
            recirc_piping: union_by_identifier(self.recirc_piping.clone(), rhs.recirc_piping),
            number_tap_points,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point::Point;
    use crate::geom::segment::LineSegment;
    use crate::hvac::piping::PipeSegment;

    fn element(name: &str, len: f64, temp: f64, hours: f64) -> PipeElement {
        let mut seg = PipeSegment::new(
            name,
            LineSegment::new(Point::new(0.0, 0.0, 0.0), Point::new(len, 0.0, 0.0)),
        );
        seg.water_temp_c = temp;
        seg.daily_period = hours;
        PipeElement::from_segments(name, vec![seg])
    }

    #[test]
    fn test_recirc_defaults_without_loop() {
        let shw = HotWaterSystem::new("shw");
        assert!((shw.recirc_temp() - 60.0).abs() < 1e-9);
        assert!((shw.recirc_hours() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_recirc_temp_length_weighted() {
        let mut shw = HotWaterSystem::new("shw");
        shw.add_recirc_piping(element("a", 30.0, 50.0, 24.0));
        shw.add_recirc_piping(element("b", 50.0, 100.0, 24.0));
        assert!((shw.recirc_temp() - 81.25).abs() < 1e-9);
        assert!((shw.recirc_hours() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_tap_points_derived_from_fixtures() {
        let mut shw = HotWaterSystem::new("shw");
        shw.add_distribution_piping(element("fix_1", 10.0, 55.0, 24.0));
        shw.add_distribution_piping(element("fix_2", 10.0, 55.0, 24.0));
        assert_eq!(shw.number_tap_points(), 2);
        shw.number_tap_points = Some(9);
        assert_eq!(shw.number_tap_points(), 9);
    }

    #[test]
    fn test_add_unions_by_identifier() {
        let shared = element("shared", 10.0, 55.0, 24.0);
        let mut left = HotWaterSystem::new("left");
        left.add_recirc_piping(shared.clone());
        left.tank_primary = Some(HotWaterTank::new("left tank"));
        let mut right = HotWaterSystem::new("right");
        right.add_recirc_piping(shared);
        right.add_recirc_piping(element("extra", 5.0, 60.0, 24.0));
        right.tank_primary = Some(HotWaterTank::new("right tank"));

        let combined = left.clone() + right;
        assert_eq!(combined.recirc_piping.len(), 2);
        assert_eq!(
            combined.tank_primary.as_ref().unwrap().base.display_name,
            "left tank"
        );
    }

    #[test]
    fn test_add_tap_points_explicit_iff_either_explicit() {
        let mut left = HotWaterSystem::new("left");
        left.add_distribution_piping(element("fix_a", 10.0, 55.0, 24.0));
        let mut right = HotWaterSystem::new("right");
        right.add_distribution_piping(element("fix_b", 10.0, 55.0, 24.0));

        let both_derived = left.clone() + right.clone();
        assert!(both_derived.number_tap_points.is_none());
        assert_eq!(both_derived.number_tap_points(), 2);

        right.number_tap_points = Some(5);
        let one_explicit = left + right;
        assert_eq!(one_explicit.number_tap_points, Some(6));
    }

    #[test]
    fn test_heater_serde_tagged() {
        let heater = HotWaterHeater::HeaterHeatPumpMonthly(HeaterHeatPumpMonthly {
            base: BaseData::new("hp"),
            percent_coverage: 1.0,
            cop_1: 3.2,
            ambient_temp_1: -7.0,
            cop_2: 4.5,
            ambient_temp_2: 7.0,
        });
        let value = serde_json::to_value(&heater).unwrap();
        assert_eq!(value["type"], "HeaterHeatPumpMonthly");
        let back: HotWaterHeater = serde_json::from_value(value).unwrap();
        assert_eq!(heater, back);
    }

    #[test]
    fn test_system_dict_round_trip() {
        let mut shw = HotWaterSystem::new("shw");
        shw.tank_primary = Some(HotWaterTank::new("tank"));
        shw.add_heater(HotWaterHeater::HeaterElectric(HeaterElectric {
            base: BaseData::new("el"),
            percent_coverage: 1.0,
        }));
        shw.add_distribution_piping(element("fix", 10.0, 55.0, 24.0));
        let value = shw.to_dict().unwrap();
        assert_eq!(value["type"], "HotWaterSystem");
        let back = HotWaterSystem::from_dict(&value).unwrap();
        assert_eq!(shw, back);
    }
}
