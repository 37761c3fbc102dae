//! Ventilation ducting. Ducts are round or rectangular; an element
//! never mixes the two.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};
use crate::geom::point::Point;
use crate::geom::segment::LineSegment;
use crate::geom::vector::Vector;

pub const DEFAULT_DUCT_DIAMETER_MM: f64 = 160.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuctShape {
    Round,
    Rectangular,
}

impl DuctShape {
    pub fn as_wufi_code(&self) -> i32 {
        match self {
            Self::Round => 1,
            Self::Rectangular => 2,
        }
    }
}

fn default_insulation_thickness() -> f64 {
    25.4
}

fn default_conductivity() -> f64 {
    0.04
}

fn default_reflective() -> bool {
    true
}

/// One straight run of duct. Cross-section dimensions are always mm
/// and are never touched by geometric scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuctSegment {
    #[serde(flatten)]
    pub base: BaseData,
    pub geometry: LineSegment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_mm: Option<f64>,
    #[serde(default = "default_insulation_thickness")]
    pub insulation_thickness_mm: f64,
    #[serde(default = "default_conductivity")]
    pub insulation_conductivity: f64,
    #[serde(default = "default_reflective")]
    pub insulation_reflective: bool,
}

impl DuctSegment {
    pub fn round(display_name: &str, geometry: LineSegment, diameter_mm: f64) -> Self {
        Self {
            base: BaseData::new(display_name),
            geometry,
            diameter_mm: Some(diameter_mm),
            width_mm: None,
            height_mm: None,
            insulation_thickness_mm: 25.4,
            insulation_conductivity: 0.04,
            insulation_reflective: true,
        }
    }

    pub fn rectangular(
        display_name: &str,
        geometry: LineSegment,
        width_mm: f64,
        height_mm: f64,
    ) -> Self {
        Self {
            base: BaseData::new(display_name),
            geometry,
            diameter_mm: None,
            width_mm: Some(width_mm),
            height_mm: Some(height_mm),
            insulation_thickness_mm: 25.4,
            insulation_conductivity: 0.04,
            insulation_reflective: true,
        }
    }

    pub fn length(&self) -> f64 {
        self.geometry.length()
    }

    /// The segment's cross-section shape. A segment loaded with both
    /// (or neither) a diameter and width/height has no clear shape and
    /// reports an error.
    pub fn shape(&self) -> Result<DuctShape> {
        match (self.diameter_mm, self.width_mm, self.height_mm) {
            (Some(_), None, None) => Ok(DuctShape::Round),
            (None, Some(_), Some(_)) => Ok(DuctShape::Rectangular),
            _ => Err(anyhow!(
                "duct segment {} has no clear shape (diameter: {:?}, width: {:?}, height: {:?})",
                self.base.display_name,
                self.diameter_mm,
                self.width_mm,
                self.height_mm
            )),
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            ..self.clone()
        }
    }

    pub fn translate(&self, vec: &Vector) -> Self {
        Self {
            geometry: self.geometry.translate(vec),
            ..self.clone()
        }
    }

    pub fn scale(&self, factor: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            geometry: self.geometry.scale(factor, origin)?,
            ..self.clone()
        })
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "DuctSegment")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "DuctSegment")
    }
}

impl HasIdentifier for DuctSegment {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

/// An ordered run of duct segments sharing one cross-section shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuctElement {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default)]
    pub segments: Vec<DuctSegment>,
}

impl DuctElement {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            segments: Vec::new(),
        }
    }

    pub fn from_segments(display_name: &str, segments: Vec<DuctSegment>) -> Self {
        Self {
            base: BaseData::new(display_name),
            segments,
        }
    }

    pub fn add_segment(&mut self, segment: DuctSegment) {
        self.segments.push(segment);
    }

    pub fn length(&self) -> f64 {
        self.segments.iter().map(DuctSegment::length).sum()
    }

    /// The shape shared by all segments, or an error when the element
    /// mixes round and rectangular runs.
    pub fn shape_type(&self) -> Result<DuctShape> {
        let mut found: Option<DuctShape> = None;
        for segment in &self.segments {
            let shape = segment.shape()?;
            match found {
                None => found = Some(shape),
                Some(s) if s == shape => {}
                Some(s) => {
                    return Err(anyhow!(
                        "duct element {} mixes shapes: {:?} and {:?}",
                        self.base.display_name,
                        s,
                        shape
                    ))
                }
            }
        }
        found.ok_or_else(|| anyhow!("duct element {} has no segments", self.base.display_name))
    }

    /// Length-weighted diameter over round segments.
    pub fn diameter_mm(&self) -> Result<f64> {
        match self.shape_type()? {
            DuctShape::Round => Ok(self.length_weighted(|s| s.diameter_mm.unwrap_or(0.0))),
            DuctShape::Rectangular => Err(anyhow!(
                "duct element {} is rectangular, it has no diameter",
                self.base.display_name
            )),
        }
    }

    /// Length-weighted (width, height) over rectangular segments.
    pub fn width_height_mm(&self) -> Result<(f64, f64)> {
        match self.shape_type()? {
            DuctShape::Rectangular => Ok((
                self.length_weighted(|s| s.width_mm.unwrap_or(0.0)),
                self.length_weighted(|s| s.height_mm.unwrap_or(0.0)),
            )),
            DuctShape::Round => Err(anyhow!(
                "duct element {} is round, it has no width/height",
                self.base.display_name
            )),
        }
    }

    fn length_weighted(&self, value: impl Fn(&DuctSegment) -> f64) -> f64 {
        let total = self.length();
        if total <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = self.segments.iter().map(|s| s.length() * value(s)).sum();
        weighted / total
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            segments: self.segments.iter().map(DuctSegment::duplicate).collect(),
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "DuctElement")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "DuctElement")
    }
}

impl HasIdentifier for DuctElement {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(len: f64) -> LineSegment {
        LineSegment::new(Point::new(0.0, 0.0, 0.0), Point::new(len, 0.0, 0.0))
    }

    #[test]
    fn test_round_element_shape_and_diameter() {
        let element = DuctElement::from_segments(
            "supply",
            vec![
                DuctSegment::round("a", line(2.0), 160.0),
                DuctSegment::round("b", line(2.0), 200.0),
            ],
        );
        assert_eq!(element.shape_type().unwrap(), DuctShape::Round);
        assert!((element.diameter_mm().unwrap() - 180.0).abs() < 1e-9);
        assert!(element.width_height_mm().is_err());
    }

    #[test]
    fn test_rectangular_element() {
        let element = DuctElement::from_segments(
            "supply",
            vec![DuctSegment::rectangular("a", line(4.0), 300.0, 150.0)],
        );
        assert_eq!(element.shape_type().unwrap(), DuctShape::Rectangular);
        let (w, h) = element.width_height_mm().unwrap();
        assert!((w - 300.0).abs() < 1e-9);
        assert!((h - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_mixed_shapes_rejected() {
        let element = DuctElement::from_segments(
            "mixed",
            vec![
                DuctSegment::round("a", line(2.0), 160.0),
                DuctSegment::rectangular("b", line(2.0), 300.0, 150.0),
            ],
        );
        let err = element.shape_type().unwrap_err().to_string();
        assert!(err.contains("mixes shapes"));
        assert!(element.diameter_mm().is_err());
    }

    #[test]
    fn test_empty_element_has_no_shape() {
        assert!(DuctElement::new("empty").shape_type().is_err());
    }

    #[test]
    fn test_scale_keeps_cross_section() {
        let seg = DuctSegment::round("a", line(2.0), 160.0);
        let scaled = seg.scale(2.0, Point::new(0.0, 0.0, 0.0)).unwrap();
        assert!((scaled.length() - 4.0).abs() < 1e-9);
        assert_eq!(scaled.diameter_mm, Some(160.0));
        assert!((scaled.insulation_thickness_mm - 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_dict_round_trip() {
        let element = DuctElement::from_segments(
            "supply",
            vec![DuctSegment::round("a", line(2.0), 160.0)],
        );
        let value = element.to_dict().unwrap();
        assert_eq!(value["type"], "DuctElement");
        let back = DuctElement::from_dict(&value).unwrap();
        assert_eq!(element, back);
    }
}
