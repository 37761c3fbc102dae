//! Floors group coplanar, touching floor segments into a single plate.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};
use crate::geom::point::Point;
use crate::geom::polygon::Polygon;
use crate::geom::vector::Vector;
use crate::space::segment::FloorSegment;

const TYPE_NAME: &str = "Floor";

/// One storey-level plate of a volume, made of one or more segments.
///
/// The optional `geometry` holds the merged outline of all segment
/// polygons. It is set by the grouping step and carried through all
/// transforms; a floor assembled by hand may leave it empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default)]
    pub segments: Vec<FloorSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Polygon>,
}

impl Floor {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            segments: Vec::new(),
            geometry: None,
        }
    }

    /// Creates a floor from a single segment, inheriting its outline.
    pub fn from_segment(segment: FloorSegment) -> Self {
        Self {
            base: BaseData::new(&segment.base.display_name),
            geometry: segment.geometry.clone(),
            segments: vec![segment],
        }
    }

    pub fn add_floor_segment(&mut self, segment: FloorSegment) {
        self.segments.push(segment);
    }

    /// Sum of the gross areas of all segments.
    pub fn floor_area(&self) -> f64 {
        self.segments.iter().map(FloorSegment::floor_area).sum()
    }

    /// Sum of the weighted areas of all segments.
    pub fn weighted_floor_area(&self) -> f64 {
        self.segments
            .iter()
            .map(FloorSegment::weighted_floor_area)
            .sum()
    }

    /// Sum of segment areas reduced by their net-area factors.
    ///
    /// Segments without a factor count at full area, so a floor where
    /// no segment carries one reports its gross area.
    pub fn net_floor_area(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| s.floor_area() * s.net_area_factor.unwrap_or(1.0))
            .sum()
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            segments: self.segments.iter().map(FloorSegment::duplicate).collect(),
            geometry: self.geometry.clone(),
        }
    }

    pub fn translate(&self, vec: &Vector) -> Self {
        Self {
            base: self.base.clone(),
            segments: self.segments.iter().map(|s| s.translate(vec)).collect(),
            geometry: self.geometry.as_ref().map(|g| g.translate(vec)),
        }
    }

    pub fn scale(&self, factor: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            base: self.base.clone(),
            segments: self
                .segments
                .iter()
                .map(|s| s.scale(factor, origin))
                .collect::<Result<_>>()?,
            geometry: match self.geometry.as_ref() {
                Some(g) => Some(g.scale(factor, origin)?),
                None => None,
            },
        })
    }

    pub fn rotate(&self, axis: &Vector, angle_deg: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            base: self.base.clone(),
            segments: self
                .segments
                .iter()
                .map(|s| s.rotate(axis, angle_deg, origin))
                .collect::<Result<_>>()?,
            geometry: match self.geometry.as_ref() {
                Some(g) => Some(g.rotate(axis, angle_deg.to_radians(), origin)?),
                None => None,
            },
        })
    }

    pub fn rotate_xy(&self, angle_deg: f64, origin: Point) -> Result<Self> {
        self.rotate(&Vector::new(0.0, 0.0, 1.0), angle_deg, origin)
    }

    pub fn reflect(&self, normal: &Vector, origin: Point) -> Result<Self> {
        Ok(Self {
            base: self.base.clone(),
            segments: self
                .segments
                .iter()
                .map(|s| s.reflect(normal, origin))
                .collect::<Result<_>>()?,
            geometry: match self.geometry.as_ref() {
                Some(g) => Some(g.reflect(normal, origin)?),
                None => None,
            },
        })
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, TYPE_NAME)
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, TYPE_NAME)
    }
}

impl HasIdentifier for Floor {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_at(x0: f64, side: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(x0, 0.0, 0.0),
            Point::new(x0 + side, 0.0, 0.0),
            Point::new(x0 + side, side, 0.0),
            Point::new(x0, side, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_floor_sums_segment_areas() {
        let mut floor = Floor::new("ground");
        floor.add_floor_segment(FloorSegment::from_polygon("a", square_at(0.0, 10.0)));
        floor.add_floor_segment(FloorSegment::from_polygon("b", square_at(10.0, 10.0)));
        assert!((floor.floor_area() - 200.0).abs() < 1e-9);
        assert!((floor.weighted_floor_area() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_area_respects_factors() {
        let mut floor = Floor::new("ground");
        let mut seg = FloorSegment::from_polygon("a", square_at(0.0, 10.0));
        seg.set_weighting_factor(0.5).unwrap();
        floor.add_floor_segment(seg);
        floor.add_floor_segment(FloorSegment::from_polygon("b", square_at(10.0, 10.0)));
        assert!((floor.floor_area() - 200.0).abs() < 1e-9);
        assert!((floor.weighted_floor_area() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_net_floor_area_defaults_to_gross() {
        let mut floor = Floor::new("ground");
        floor.add_floor_segment(FloorSegment::from_polygon("a", square_at(0.0, 10.0)));
        assert!((floor.net_floor_area() - 100.0).abs() < 1e-9);
        floor.segments[0].net_area_factor = Some(0.8);
        assert!((floor.net_floor_area() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_scales_all_segments() {
        let mut floor = Floor::new("ground");
        floor.add_floor_segment(FloorSegment::from_polygon("a", square_at(0.0, 10.0)));
        let scaled = floor.scale(2.0, Point::new(0.0, 0.0, 0.0)).unwrap();
        assert!((scaled.floor_area() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_dict_round_trip() {
        let mut floor = Floor::new("ground");
        floor.add_floor_segment(FloorSegment::from_polygon("a", square_at(0.0, 10.0)));
        floor.geometry = floor.segments[0].geometry.clone();
        let value = floor.to_dict().unwrap();
        assert_eq!(value["type"], "Floor");
        let back = Floor::from_dict(&value).unwrap();
        assert_eq!(floor, back);
    }
}
