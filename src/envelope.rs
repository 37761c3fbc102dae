//! Envelope detail records: thermal bridges and window frame/glazing
//! construction data.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};

/// WUFI thermal-bridge group codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThermalBridgeGroup {
    AmbientAir,
    Perimeter,
    FloorSlab,
}

impl ThermalBridgeGroup {
    pub fn as_wufi_code(&self) -> i32 {
        match self {
            Self::AmbientAir => 15,
            Self::Perimeter => 16,
            Self::FloorSlab => 17,
        }
    }
}

impl Default for ThermalBridgeGroup {
    fn default() -> Self {
        Self::AmbientAir
    }
}

fn default_psi() -> f64 {
    0.01
}

fn default_frsi() -> f64 {
    0.75
}

/// A linear thermal bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalBridge {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default)]
    pub group: ThermalBridgeGroup,
    /// Bridge length in model units.
    #[serde(default)]
    pub length: f64,
    /// Linear transmittance in W/(m K).
    #[serde(default = "default_psi")]
    pub psi_value: f64,
    /// Interior surface temperature factor.
    #[serde(default = "default_frsi")]
    pub frsi_value: f64,
}

impl ThermalBridge {
    pub fn new(display_name: &str, group: ThermalBridgeGroup, length: f64) -> Self {
        Self {
            base: BaseData::new(display_name),
            group,
            length,
            psi_value: 0.01,
            frsi_value: 0.75,
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            ..self.clone()
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "ThermalBridge")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "ThermalBridge")
    }
}

impl HasIdentifier for ThermalBridge {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

fn default_frame_width() -> f64 {
    0.1
}

fn default_u_value() -> f64 {
    1.0
}

fn default_psi_edge() -> f64 {
    0.04
}

/// One edge of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowFrameElement {
    /// Face width of the frame edge in model units (m).
    #[serde(default = "default_frame_width")]
    pub width: f64,
    #[serde(default = "default_u_value")]
    pub u_value: f64,
    /// Glazing-edge psi in W/(m K).
    #[serde(default = "default_psi_edge")]
    pub psi_glazing: f64,
    /// Install psi in W/(m K).
    #[serde(default = "default_psi_edge")]
    pub psi_install: f64,
}

impl Default for WindowFrameElement {
    fn default() -> Self {
        Self {
            width: 0.1,
            u_value: 1.0,
            psi_glazing: 0.04,
            psi_install: 0.04,
        }
    }
}

/// A window frame: four edges, clockwise from the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default)]
    pub top: WindowFrameElement,
    #[serde(default)]
    pub right: WindowFrameElement,
    #[serde(default)]
    pub bottom: WindowFrameElement,
    #[serde(default)]
    pub left: WindowFrameElement,
}

impl WindowFrame {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            top: WindowFrameElement::default(),
            right: WindowFrameElement::default(),
            bottom: WindowFrameElement::default(),
            left: WindowFrameElement::default(),
        }
    }

    pub fn elements(&self) -> [&WindowFrameElement; 4] {
        [&self.top, &self.right, &self.bottom, &self.left]
    }

    /// Mean face width over the four edges.
    pub fn average_width(&self) -> f64 {
        self.elements().iter().map(|e| e.width).sum::<f64>() / 4.0
    }

    pub fn average_u_value(&self) -> f64 {
        self.elements().iter().map(|e| e.u_value).sum::<f64>() / 4.0
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            ..self.clone()
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "WindowFrame")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "WindowFrame")
    }
}

impl HasIdentifier for WindowFrame {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

fn default_g_value() -> f64 {
    0.4
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowGlazing {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_u_value")]
    pub u_value: f64,
    /// Solar heat-gain coefficient, 0..1.
    #[serde(default = "default_g_value")]
    pub g_value: f64,
}

impl WindowGlazing {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            u_value: 1.0,
            g_value: 0.4,
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            ..self.clone()
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "WindowGlazing")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "WindowGlazing")
    }
}

impl HasIdentifier for WindowGlazing {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thermal_bridge_defaults() {
        let tb = ThermalBridge::new("slab edge", ThermalBridgeGroup::Perimeter, 24.0);
        assert_eq!(tb.group.as_wufi_code(), 16);
        assert!((tb.psi_value - 0.01).abs() < 1e-9);
        assert!((tb.frsi_value - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_frame_averages() {
        let mut frame = WindowFrame::new("frame");
        frame.top.width = 0.2;
        assert!((frame.average_width() - 0.125).abs() < 1e-9);
        assert!((frame.average_u_value() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dict_round_trips() {
        let tb = ThermalBridge::new("tb", ThermalBridgeGroup::FloorSlab, 10.0);
        let back = ThermalBridge::from_dict(&tb.to_dict().unwrap()).unwrap();
        assert_eq!(tb, back);

        let frame = WindowFrame::new("frame");
        let back = WindowFrame::from_dict(&frame.to_dict().unwrap()).unwrap();
        assert_eq!(frame, back);

        let glazing = WindowGlazing::new("glass");
        let back = WindowGlazing::from_dict(&glazing.to_dict().unwrap()).unwrap();
        assert_eq!(glazing, back);
    }
}
