//! Volumes pair a floor with an average ceiling height and, optionally,
//! the side faces enclosing the air body above the floor.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};
use crate::geom::point::Point;
use crate::geom::polygon::Polygon;
use crate::geom::vector::Vector;
use crate::space::floor::Floor;

const TYPE_NAME: &str = "Volume";

fn default_ceiling_height() -> f64 {
    2.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    #[serde(flatten)]
    pub base: BaseData,
    pub floor: Floor,
    #[serde(default = "default_ceiling_height")]
    pub avg_ceiling_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<Polygon>>,
}

impl Volume {
    pub fn new(display_name: &str, floor: Floor, avg_ceiling_height: f64) -> Self {
        Self {
            base: BaseData::new(display_name),
            floor,
            avg_ceiling_height,
            geometry: None,
        }
    }

    pub fn set_floor(&mut self, floor: Floor) {
        self.floor = floor;
    }

    pub fn floor_area(&self) -> f64 {
        self.floor.floor_area()
    }

    pub fn weighted_floor_area(&self) -> f64 {
        self.floor.weighted_floor_area()
    }

    /// Air volume above the floor: net floor area times average
    /// ceiling height. Without net-area factors this is the gross
    /// area times the height.
    pub fn net_volume(&self) -> f64 {
        self.floor.net_floor_area() * self.avg_ceiling_height
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            floor: self.floor.duplicate(),
            avg_ceiling_height: self.avg_ceiling_height,
            geometry: self.geometry.clone(),
        }
    }

    pub fn translate(&self, vec: &Vector) -> Self {
        Self {
            base: self.base.clone(),
            floor: self.floor.translate(vec),
            avg_ceiling_height: self.avg_ceiling_height,
            geometry: self
                .geometry
                .as_ref()
                .map(|faces| faces.iter().map(|f| f.translate(vec)).collect()),
        }
    }

    /// Scaled copy. The ceiling height is a length and scales with the
    /// same factor as the geometry.
    pub fn scale(&self, factor: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            base: self.base.clone(),
            floor: self.floor.scale(factor, origin)?,
            avg_ceiling_height: self.avg_ceiling_height * factor,
            geometry: self.scaled_geometry(factor, origin)?,
        })
    }

    pub fn rotate(&self, axis: &Vector, angle_deg: f64, origin: Point) -> Result<Self> {
        let phi = angle_deg.to_radians();
        Ok(Self {
            base: self.base.clone(),
            floor: self.floor.rotate(axis, angle_deg, origin)?,
            avg_ceiling_height: self.avg_ceiling_height,
            geometry: match self.geometry.as_ref() {
                Some(faces) => Some(
                    faces
                        .iter()
                        .map(|f| f.rotate(axis, phi, origin))
                        .collect::<Result<_>>()?,
                ),
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
            floor: self.floor.reflect(normal, origin)?,
            avg_ceiling_height: self.avg_ceiling_height,
            geometry: match self.geometry.as_ref() {
                Some(faces) => Some(
                    faces
                        .iter()
                        .map(|f| f.reflect(normal, origin))
                        .collect::<Result<_>>()?,
                ),
                None => None,
            },
        })
    }

    fn scaled_geometry(&self, factor: f64, origin: Point) -> Result<Option<Vec<Polygon>>> {
        match self.geometry.as_ref() {
            Some(faces) => Ok(Some(
                faces
                    .iter()
                    .map(|f| f.scale(factor, origin))
                    .collect::<Result<_>>()?,
            )),
            None => Ok(None),
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, TYPE_NAME)
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, TYPE_NAME)
    }
}

impl HasIdentifier for Volume {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}
