//! Mechanical systems: hot-water piping, ventilation, heating, heat
//! pumps and the small-device catalog, all in their persisted
//! type-tagged forms.

pub mod ducting;
pub mod exhaust;
pub mod heat_pump;
pub mod heating;
pub mod hot_water;
pub mod piping;
pub mod renewable;
pub mod supportive;
pub mod ventilation;

pub use ducting::{DuctElement, DuctSegment, DuctShape};
pub use exhaust::ExhaustVentDevice;
pub use heat_pump::HeatPumpSystem;
pub use heating::HeatingSystem;
pub use hot_water::{HotWaterHeater, HotWaterSystem, HotWaterTank};
pub use piping::{PipeBranch, PipeElement, PipeMaterial, PipeSegment, PipeTrunk};
pub use renewable::RenewableDevice;
pub use supportive::{SupportiveDevice, SupportiveDeviceKind};
pub use ventilation::{VentilationSystem, VentilationSystemType, Ventilator};

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use crate::base::HasIdentifier;

/// Appends the right-hand items whose identifiers are not already
/// present on the left. Left instances win on collision.
pub(crate) fn union_by_identifier<T: HasIdentifier>(mut left: Vec<T>, right: Vec<T>) -> Vec<T> {
    for item in right {
        if !left.iter().any(|x| x.identifier() == item.identifier()) {
            left.push(item);
        }
    }
    left
}

/// Any mechanical device the catalog can hold, for callers routing on
/// the serialized `type` tag rather than a known family.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyMechDevice {
    Ventilation(VentilationSystem),
    Heating(HeatingSystem),
    HeatPump(HeatPumpSystem),
    Exhaust(ExhaustVentDevice),
    Supportive(SupportiveDevice),
    Renewable(RenewableDevice),
}

impl HasIdentifier for AnyMechDevice {
    fn identifier(&self) -> &str {
        match self {
            Self::Ventilation(d) => d.identifier(),
            Self::Heating(d) => d.identifier(),
            Self::HeatPump(d) => d.identifier(),
            Self::Exhaust(d) => d.identifier(),
            Self::Supportive(d) => d.identifier(),
            Self::Renewable(d) => d.identifier(),
        }
    }
}

fn all_device_kinds() -> Vec<&'static str> {
    let mut kinds = vec!["VentilationSystem", "SupportiveDevice"];
    kinds.extend_from_slice(HeatingSystem::KINDS);
    kinds.extend_from_slice(HeatPumpSystem::KINDS);
    kinds.extend_from_slice(ExhaustVentDevice::KINDS);
    kinds.extend_from_slice(RenewableDevice::KINDS);
    kinds
}

/// Builds a mechanical device from its type-tagged dict form, routing
/// by the `type` discriminator. Unknown kinds report the full list of
/// accepted ones.
pub fn device_from_value(value: &Value) -> Result<AnyMechDevice> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("device dict has no 'type' tag"))?;
    let parse_ctx = || format!("failed to read device of kind {}", kind);
    if kind == "VentilationSystem" {
        return Ok(AnyMechDevice::Ventilation(
            serde_json::from_value(value.clone()).with_context(parse_ctx)?,
        ));
    }
    if kind == "SupportiveDevice" {
        return Ok(AnyMechDevice::Supportive(
            serde_json::from_value(value.clone()).with_context(parse_ctx)?,
        ));
    }
    if HeatingSystem::KINDS.contains(&kind) {
        return Ok(AnyMechDevice::Heating(
            serde_json::from_value(value.clone()).with_context(parse_ctx)?,
        ));
    }
    if HeatPumpSystem::KINDS.contains(&kind) {
        return Ok(AnyMechDevice::HeatPump(
            serde_json::from_value(value.clone()).with_context(parse_ctx)?,
        ));
    }
    if ExhaustVentDevice::KINDS.contains(&kind) {
        return Ok(AnyMechDevice::Exhaust(
            serde_json::from_value(value.clone()).with_context(parse_ctx)?,
        ));
    }
    if RenewableDevice::KINDS.contains(&kind) {
        return Ok(AnyMechDevice::Renewable(
            serde_json::from_value(value.clone()).with_context(parse_ctx)?,
        ));
    }
    Err(anyhow!(
        "unknown mechanical device kind: {}; expected one of: {}",
        kind,
        all_device_kinds().join(", ")
    ))
}

/// Builds a hot-water heater from its type-tagged dict form.
pub fn heater_from_value(value: &Value) -> Result<HotWaterHeater> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("heater dict has no 'type' tag"))?;
    if !HotWaterHeater::KINDS.contains(&kind) {
        return Err(anyhow!(
            "unknown water heater kind: {}; expected one of: {}",
            kind,
            HotWaterHeater::KINDS.join(", ")
        ));
    }
    serde_json::from_value(value.clone())
        .with_context(|| format!("failed to read water heater of kind {}", kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::BaseData;

    #[test]
    fn test_device_from_value_routes_by_tag() {
        let vent = VentilationSystem::new("erv");
        let value = vent.to_dict().unwrap();
        match device_from_value(&value).unwrap() {
            AnyMechDevice::Ventilation(v) => assert_eq!(v, vent),
            other => panic!("routed to the wrong family: {:?}", other),
        }

        let hp = serde_json::json!({
            "type": "HeatPumpAnnual",
            "identifier": "hp1",
            "display_name": "ashp",
            "user_data": {},
            "annual_cop": 3.4
        });
        assert!(matches!(
            device_from_value(&hp).unwrap(),
            AnyMechDevice::HeatPump(_)
        ));
    }

    #[test]
    fn test_device_from_value_unknown_kind_lists_accepted() {
        let value = serde_json::json!({"type": "PerpetualMotionMachine"});
        let err = device_from_value(&value).unwrap_err().to_string();
        assert!(err.contains("PerpetualMotionMachine"));
        assert!(err.contains("VentilationSystem"));
        assert!(err.contains("HeatPumpAnnual"));
    }

    #[test]
    fn test_heater_from_value() {
        let heater = HotWaterHeater::HeaterElectric(hot_water::HeaterElectric {
            base: BaseData::new("el"),
            percent_coverage: 1.0,
        });
        let value = serde_json::to_value(&heater).unwrap();
        assert_eq!(heater_from_value(&value).unwrap(), heater);

        let bad = serde_json::json!({"type": "HeaterColdFusion"});
        let err = heater_from_value(&bad).unwrap_err().to_string();
        assert!(err.contains("HeaterColdFusion"));
        assert!(err.contains("HeaterHeatPumpMonthly"));
    }
}
