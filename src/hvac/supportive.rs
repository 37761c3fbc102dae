//! Supportive (auxiliary) electrical devices: circulation pumps and
//! other small loads.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};

/// WUFI supportive-device kind codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupportiveDeviceKind {
    HeatCirculatingPump,
    DhwCirculatingPump,
    DhwStoragePump,
    Other,
}

impl SupportiveDeviceKind {
    pub fn as_wufi_code(&self) -> i32 {
        match self {
            Self::HeatCirculatingPump => 10,
            Self::DhwCirculatingPump => 11,
            Self::DhwStoragePump => 12,
            Self::Other => 14,
        }
    }
}

impl Default for SupportiveDeviceKind {
    fn default() -> Self {
        Self::Other
    }
}

fn default_quantity() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_period_khrs() -> f64 {
    8.760
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportiveDevice {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default)]
    pub device_kind: SupportiveDeviceKind,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default = "default_true")]
    pub in_conditioned_space: bool,
    /// Rated electrical demand in W.
    #[serde(default)]
    pub norm_energy_demand_w: f64,
    /// Annual operating period in thousands of hours.
    #[serde(default = "default_period_khrs")]
    pub annual_period_operation_khrs: f64,
}

impl SupportiveDevice {
    pub fn new(display_name: &str, device_kind: SupportiveDeviceKind) -> Self {
        Self {
            base: BaseData::new(display_name),
            device_kind,
            quantity: 1,
            in_conditioned_space: true,
            norm_energy_demand_w: 0.0,
            annual_period_operation_khrs: 8.760,
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            ..self.clone()
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "SupportiveDevice")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "SupportiveDevice")
    }
}

impl HasIdentifier for SupportiveDevice {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}
