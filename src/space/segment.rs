//! Floor segments, the smallest unit of floor area inside a space.
//!
//! A segment wraps a single horizontal polygon together with its
//! weighting factor (TFA/iCFA) and an optional net-area factor used
//! for net-volume calculations. Segments without geometry are legal
//! and contribute zero area.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};
use crate::geom::point::Point;
use crate::geom::polygon::Polygon;
use crate::geom::vector::Vector;

const TYPE_NAME: &str = "FloorSegment";

fn default_weighting_factor() -> f64 {
    1.0
}

/// A single weighted patch of floor area.
///
/// The reference point is derived from the geometry: the polygon
/// centroid, pulled to the nearest boundary point whenever the
/// centroid falls outside a non-convex polygon. It is kept in sync
/// by the constructors and by all geometric transforms, so the
/// invariant "reference point lies within the polygon" always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorSegment {
    #[serde(flatten)]
    pub base: BaseData,
    pub geometry: Option<Polygon>,
    pub reference_point: Option<Point>,
    #[serde(default = "default_weighting_factor")]
    weighting_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_area_factor: Option<f64>,
}

impl FloorSegment {
    /// Creates a segment with no geometry.
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            geometry: None,
            reference_point: None,
            weighting_factor: 1.0,
            net_area_factor: None,
        }
    }

    /// Creates a segment from a floor polygon and derives its reference point.
    pub fn from_polygon(display_name: &str, geometry: Polygon) -> Self {
        let reference_point = reference_point_for(&geometry);
        Self {
            base: BaseData::new(display_name),
            geometry: Some(geometry),
            reference_point: Some(reference_point),
            weighting_factor: 1.0,
            net_area_factor: None,
        }
    }

    /// Replaces the geometry and re-derives the reference point.
    pub fn set_geometry(&mut self, geometry: Polygon) {
        self.reference_point = Some(reference_point_for(&geometry));
        self.geometry = Some(geometry);
    }

    pub fn weighting_factor(&self) -> f64 {
        self.weighting_factor
    }

    /// Sets the TFA/iCFA weighting factor. Must lie within `[0, 1]`.
    pub fn set_weighting_factor(&mut self, factor: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&factor) {
            return Err(anyhow!(
                "weighting factor must be within [0, 1], got {}",
                factor
            ));
        }
        self.weighting_factor = factor;
        Ok(())
    }

    /// Gross area of the segment polygon (zero without geometry).
    pub fn floor_area(&self) -> f64 {
        self.geometry.as_ref().map(Polygon::area).unwrap_or(0.0)
    }

    /// Gross area multiplied by the weighting factor.
    pub fn weighted_floor_area(&self) -> f64 {
        self.floor_area() * self.weighting_factor
    }

    /// Deep copy under a fresh identifier.
    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            ..self.clone()
        }
    }

    /// Moved copy. A segment without geometry is returned unchanged.
    pub fn translate(&self, vec: &Vector) -> Self {
        let Some(geometry) = self.geometry.as_ref() else {
            return self.clone();
        };
        Self {
            geometry: Some(geometry.translate(vec)),
            reference_point: self.reference_point.map(|p| p + *vec),
            ..self.clone()
        }
    }

    /// Scaled copy about `origin`.
    pub fn scale(&self, factor: f64, origin: Point) -> Result<Self> {
        let Some(geometry) = self.geometry.as_ref() else {
            return Ok(self.clone());
        };
        Ok(Self {
            geometry: Some(geometry.scale(factor, origin)?),
            reference_point: self
                .reference_point
                .map(|p| origin + (p - origin) * factor),
            ..self.clone()
        })
    }

    /// Rotated copy about `axis` anchored at `origin`, angle in degrees.
    pub fn rotate(&self, axis: &Vector, angle_deg: f64, origin: Point) -> Result<Self> {
        let Some(geometry) = self.geometry.as_ref() else {
            return Ok(self.clone());
        };
        let phi = angle_deg.to_radians();
        let rotated = geometry.rotate(axis, phi, origin)?;
        let reference_point = match self.reference_point {
            Some(p) => Some(rotate_point(p, axis, phi, origin)?),
            None => None,
        };
        Ok(Self {
            geometry: Some(rotated),
            reference_point,
            ..self.clone()
        })
    }

    /// Rotated copy about the world Z axis, angle in degrees.
    pub fn rotate_xy(&self, angle_deg: f64, origin: Point) -> Result<Self> {
        self.rotate(&Vector::new(0.0, 0.0, 1.0), angle_deg, origin)
    }

    /// Mirrored copy across the plane defined by `normal` and `origin`.
    pub fn reflect(&self, normal: &Vector, origin: Point) -> Result<Self> {
        let Some(geometry) = self.geometry.as_ref() else {
            return Ok(self.clone());
        };
        Ok(Self {
            geometry: Some(geometry.reflect(normal, origin)?),
            reference_point: self
                .reference_point
                .map(|p| reflect_point(p, normal, origin)),
            ..self.clone()
        })
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, TYPE_NAME)
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, TYPE_NAME)
    }
}

impl HasIdentifier for FloorSegment {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

/// Picks the point representing a floor polygon: its centroid, or the
/// nearest boundary point when the centroid lies outside the polygon.
pub fn reference_point_for(polygon: &Polygon) -> Point {
    let centroid = polygon.centroid();
    if polygon.is_point_inside(centroid, true) {
        centroid
    } else {
        polygon.nearest_boundary_point(centroid)
    }
}

pub(crate) fn rotate_point(p: Point, axis: &Vector, phi: f64, origin: Point) -> Result<Point> {
    use crate::geom::transform::rotate_points_about;
    let unit = axis.normalize()?;
    let rotated = rotate_points_about(&[p], &unit, phi, origin);
    Ok(rotated[0])
}

pub(crate) fn reflect_point(p: Point, normal: &Vector, origin: Point) -> Point {
    use crate::geom::transform::reflect_points;
    reflect_points(&[p], normal, origin)[0]
}
