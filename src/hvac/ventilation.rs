//! Ventilation systems and their heat-recovery ventilators.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};
use crate::hvac::ducting::DuctElement;

/// WUFI ventilation system-type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VentilationSystemType {
    /// Balanced mechanical ventilation with heat recovery.
    Balanced,
    /// Balanced mechanical ventilation without heat recovery.
    NoHeatRecovery,
    ExtractOnly,
    WindowOnly,
}

impl VentilationSystemType {
    pub fn as_wufi_code(&self) -> i32 {
        match self {
            Self::Balanced => 1,
            Self::NoHeatRecovery => 2,
            Self::ExtractOnly => 3,
            Self::WindowOnly => 4,
        }
    }
}

impl Default for VentilationSystemType {
    fn default() -> Self {
        Self::Balanced
    }
}

fn default_electric_efficiency() -> f64 {
    0.55
}

fn default_frost_threshold() -> f64 {
    -5.0
}

fn default_true() -> bool {
    true
}

fn default_quantity() -> i32 {
    1
}

/// A heat-recovery ventilation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ventilator {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    /// Sensible heat-recovery fraction, 0..1.
    #[serde(default)]
    pub sensible_heat_recovery: f64,
    /// Latent (moisture) recovery fraction, 0..1.
    #[serde(default)]
    pub latent_heat_recovery: f64,
    /// Fan power in W per m3/h of airflow.
    #[serde(default = "default_electric_efficiency")]
    pub electric_efficiency: f64,
    #[serde(default = "default_true")]
    pub frost_protection_required: bool,
    /// Outdoor temperature below which frost protection runs.
    #[serde(default = "default_frost_threshold")]
    pub frost_protection_threshold_c: f64,
    #[serde(default = "default_true")]
    pub in_conditioned_space: bool,
}

impl Ventilator {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            quantity: 1,
            sensible_heat_recovery: 0.0,
            latent_heat_recovery: 0.0,
            electric_efficiency: 0.55,
            frost_protection_required: true,
            frost_protection_threshold_c: -5.0,
            in_conditioned_space: true,
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            ..self.clone()
        }
    }
}

impl HasIdentifier for Ventilator {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

/// A ventilation system: type code, optional ventilator unit and the
/// supply/exhaust duct runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentilationSystem {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default)]
    pub sys_type: VentilationSystemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ventilator: Option<Ventilator>,
    #[serde(default)]
    pub supply_ducting: Vec<DuctElement>,
    #[serde(default)]
    pub exhaust_ducting: Vec<DuctElement>,
}

impl VentilationSystem {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            sys_type: VentilationSystemType::Balanced,
            ventilator: None,
            supply_ducting: Vec::new(),
            exhaust_ducting: Vec::new(),
        }
    }

    pub fn add_supply_ducting(&mut self, element: DuctElement) {
        self.supply_ducting.push(element);
    }

    pub fn add_exhaust_ducting(&mut self, element: DuctElement) {
        self.exhaust_ducting.push(element);
    }

    /// Sensible recovery of the installed ventilator, zero without one.
    pub fn sensible_heat_recovery(&self) -> f64 {
        self.ventilator
            .as_ref()
            .map(|v| v.sensible_heat_recovery)
            .unwrap_or(0.0)
    }

    /// Latent recovery of the installed ventilator, zero without one.
    pub fn latent_heat_recovery(&self) -> f64 {
        self.ventilator
            .as_ref()
            .map(|v| v.latent_heat_recovery)
            .unwrap_or(0.0)
    }

    pub fn electric_efficiency(&self) -> f64 {
        self.ventilator
            .as_ref()
            .map(|v| v.electric_efficiency)
            .unwrap_or(0.0)
    }

    pub fn total_supply_duct_length(&self) -> f64 {
        self.supply_ducting.iter().map(DuctElement::length).sum()
    }

    pub fn total_exhaust_duct_length(&self) -> f64 {
        self.exhaust_ducting.iter().map(DuctElement::length).sum()
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            sys_type: self.sys_type,
            ventilator: self.ventilator.as_ref().map(Ventilator::duplicate),
            supply_ducting: self
                .supply_ducting
                .iter()
                .map(DuctElement::duplicate)
                .collect(),
            exhaust_ducting: self
                .exhaust_ducting
                .iter()
                .map(DuctElement::duplicate)
                .collect(),
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "VentilationSystem")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "VentilationSystem")
    }
}

impl HasIdentifier for VentilationSystem {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}
