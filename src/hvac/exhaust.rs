//! Exhaust-only ventilation devices (dryers, kitchen hoods).

use serde::{Deserialize, Serialize};

use crate::base::{BaseData, HasIdentifier};

fn default_runtime() -> f64 {
    0.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhaustVentDryer {
    #[serde(flatten)]
    pub base: BaseData,
    /// Exhaust airflow in m3/h.
    pub exhaust_flow_rate_m3h: f64,
    /// Annual runtime in minutes.
    #[serde(default = "default_runtime")]
    pub annual_runtime_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhaustVentKitchenHood {
    #[serde(flatten)]
    pub base: BaseData,
    pub exhaust_flow_rate_m3h: f64,
    #[serde(default = "default_runtime")]
    pub annual_runtime_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhaustVentUserDetermined {
    #[serde(flatten)]
    pub base: BaseData,
    pub exhaust_flow_rate_m3h: f64,
    #[serde(default = "default_runtime")]
    pub annual_runtime_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExhaustVentDevice {
    ExhaustVentDryer(ExhaustVentDryer),
    ExhaustVentKitchenHood(ExhaustVentKitchenHood),
    ExhaustVentUserDetermined(ExhaustVentUserDetermined),
}

impl ExhaustVentDevice {
    pub const KINDS: &'static [&'static str] = &[
        "ExhaustVentDryer",
        "ExhaustVentKitchenHood",
        "ExhaustVentUserDetermined",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ExhaustVentDryer(_) => "ExhaustVentDryer",
            Self::ExhaustVentKitchenHood(_) => "ExhaustVentKitchenHood",
            Self::ExhaustVentUserDetermined(_) => "ExhaustVentUserDetermined",
        }
    }

    pub fn base(&self) -> &BaseData {
        match self {
            Self::ExhaustVentDryer(d) => &d.base,
            Self::ExhaustVentKitchenHood(d) => &d.base,
            Self::ExhaustVentUserDetermined(d) => &d.base,
        }
    }

    pub fn exhaust_flow_rate_m3h(&self) -> f64 {
        match self {
            Self::ExhaustVentDryer(d) => d.exhaust_flow_rate_m3h,
            Self::ExhaustVentKitchenHood(d) => d.exhaust_flow_rate_m3h,
            Self::ExhaustVentUserDetermined(d) => d.exhaust_flow_rate_m3h,
        }
    }

    pub fn annual_runtime_minutes(&self) -> f64 {
        match self {
            Self::ExhaustVentDryer(d) => d.annual_runtime_minutes,
            Self::ExhaustVentKitchenHood(d) => d.annual_runtime_minutes,
            Self::ExhaustVentUserDetermined(d) => d.annual_runtime_minutes,
        }
    }
}

impl HasIdentifier for ExhaustVentDevice {
    fn identifier(&self) -> &str {
        &self.base().identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serde() {
        let device = ExhaustVentDevice::ExhaustVentKitchenHood(ExhaustVentKitchenHood {
            base: BaseData::new("hood"),
            exhaust_flow_rate_m3h: 350.0,
            annual_runtime_minutes: 20000.0,
        });
        let value = serde_json::to_value(&device).unwrap();
        assert_eq!(value["type"], "ExhaustVentKitchenHood");
        let back: ExhaustVentDevice = serde_json::from_value(value).unwrap();
        assert_eq!(device, back);
        assert!((back.exhaust_flow_rate_m3h() - 350.0).abs() < 1e-9);
    }
}
