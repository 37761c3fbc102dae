//! Interior spaces made of volumes, floors and floor segments.
//!
//! The hierarchy mirrors how Passive House floor areas are taken off:
//! a [`Space`] owns one or more [`Volume`]s, each volume owns a
//! [`Floor`], and each floor is a collection of weighted
//! [`FloorSegment`]s. All derived quantities (areas, volumes, average
//! heights) are computed on demand from the geometry, never stored.

pub mod floor;
pub mod host;
pub mod segment;
pub mod volume;

pub use floor::Floor;
pub use host::{group_floor_segments, host_spaces_in_rooms, FloorGrouping, HostingOutcome};
pub use segment::FloorSegment;
pub use volume::Volume;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};
use crate::geom::mesh::Mesh;
use crate::geom::point::Point;
use crate::geom::polygon::Polygon;
use crate::geom::vector::Vector;

const TYPE_NAME: &str = "Space";

fn default_quantity() -> i32 {
    1
}

fn default_wufi_type() -> i32 {
    99
}

/// A named interior space, e.g. "101: Kitchen".
///
/// `host` is the identifier of the room the space sits inside. It is
/// assigned by the hosting step and is deliberately not serialized;
/// callers pass it back in through [`Space::from_dict`], the same way
/// the room re-attaches its own child objects on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    #[serde(flatten)]
    pub base: BaseData,
    pub name: String,
    pub number: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    /// WUFI room-use code. 99 is the catch-all "user defined".
    #[serde(default = "default_wufi_type")]
    pub wufi_type: i32,
    #[serde(default)]
    pub volumes: Vec<Volume>,
    /// Peak number of occupants, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_occupancy: Option<f64>,
    /// Design supply airflow in m3/h.
    #[serde(default)]
    pub vent_flow_supply: f64,
    /// Design extract airflow in m3/h.
    #[serde(default)]
    pub vent_flow_extract: f64,
    /// Design transfer airflow in m3/h.
    #[serde(default)]
    pub vent_flow_transfer: f64,
    #[serde(skip)]
    pub host: Option<String>,
}

impl Space {
    pub fn new(name: &str, number: &str) -> Self {
        Self {
            base: BaseData::new(name),
            name: name.to_string(),
            number: number.to_string(),
            quantity: 1,
            wufi_type: 99,
            volumes: Vec::new(),
            peak_occupancy: None,
            vent_flow_supply: 0.0,
            vent_flow_extract: 0.0,
            vent_flow_transfer: 0.0,
            host: None,
        }
    }

    /// "number: name", the display form used in WUFI room lists.
    pub fn full_name(&self) -> String {
        format!("{}: {}", self.number, self.name)
    }

    pub fn add_new_volumes(&mut self, volumes: impl IntoIterator<Item = Volume>) {
        self.volumes.extend(volumes);
    }

    /// Gross floor area over all volumes.
    pub fn floor_area(&self) -> f64 {
        self.volumes.iter().map(Volume::floor_area).sum()
    }

    /// Weighted (TFA/iCFA) floor area over all volumes.
    pub fn weighted_floor_area(&self) -> f64 {
        self.volumes.iter().map(Volume::weighted_floor_area).sum()
    }

    /// Net air volume over all volumes.
    pub fn net_volume(&self) -> f64 {
        self.volumes.iter().map(Volume::net_volume).sum()
    }

    /// Floor-area-weighted average ceiling height. Zero for a space
    /// without any floor area.
    pub fn avg_clear_height(&self) -> f64 {
        let area = self.floor_area();
        if area <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = self
            .volumes
            .iter()
            .map(|v| v.floor_area() * v.avg_ceiling_height)
            .sum();
        weighted / area
    }

    /// Ratio of weighted to gross floor area. A space without floor
    /// area reports 1.0 so that it never discounts anything.
    pub fn average_floor_weighting_factor(&self) -> f64 {
        let area = self.floor_area();
        if area <= 0.0 {
            return 1.0;
        }
        self.weighted_floor_area() / area
    }

    /// Reference points of all floor segments, used for hosting.
    pub fn reference_points(&self) -> Vec<Point> {
        self.volumes
            .iter()
            .flat_map(|v| v.floor.segments.iter())
            .filter_map(|s| s.reference_point)
            .collect()
    }

    /// Every polygon of the space: floor segments plus volume side
    /// faces, in volume order.
    pub fn polygons(&self) -> Vec<&Polygon> {
        let mut polys = Vec::new();
        for vol in &self.volumes {
            for seg in &vol.floor.segments {
                if let Some(g) = seg.geometry.as_ref() {
                    polys.push(g);
                }
            }
            if let Some(faces) = vol.geometry.as_ref() {
                polys.extend(faces.iter());
            }
        }
        polys
    }

    /// Deep copy, optionally re-homed to a different room.
    pub fn duplicate(&self, new_host: Option<&str>) -> Self {
        Self {
            base: self.base.duplicate(),
            volumes: self.volumes.iter().map(Volume::duplicate).collect(),
            host: new_host.map(str::to_string).or_else(|| self.host.clone()),
            ..self.clone()
        }
    }

    pub fn translate(&self, vec: &Vector) -> Self {
        Self {
            volumes: self.volumes.iter().map(|v| v.translate(vec)).collect(),
            ..self.clone()
        }
    }

    pub fn scale(&self, factor: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            volumes: self
                .volumes
                .iter()
                .map(|v| v.scale(factor, origin))
                .collect::<Result<_>>()?,
            ..self.clone()
        })
    }

    pub fn rotate(&self, axis: &Vector, angle_deg: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            volumes: self
                .volumes
                .iter()
                .map(|v| v.rotate(axis, angle_deg, origin))
                .collect::<Result<_>>()?,
            ..self.clone()
        })
    }

    pub fn rotate_xy(&self, angle_deg: f64, origin: Point) -> Result<Self> {
        self.rotate(&Vector::new(0.0, 0.0, 1.0), angle_deg, origin)
    }

    pub fn reflect(&self, normal: &Vector, origin: Point) -> Result<Self> {
        Ok(Self {
            volumes: self
                .volumes
                .iter()
                .map(|v| v.reflect(normal, origin))
                .collect::<Result<_>>()?,
            ..self.clone()
        })
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, TYPE_NAME)
    }

    /// Like [`Space::to_dict`] but with a `mesh` key holding the
    /// fan-triangulated mesh of every polygon in the space. Useful for
    /// previews; [`Space::from_dict`] ignores the key on the way back.
    pub fn to_dict_with_mesh(&self) -> Result<Value> {
        let mut value = self.to_dict()?;
        let mesh = Mesh::from_polygons(self.polygons());
        let map = value
            .as_object_mut()
            .ok_or_else(|| anyhow!("space did not serialize to an object"))?;
        map.insert("mesh".to_string(), serde_json::to_value(mesh)?);
        Ok(value)
    }

    pub fn from_dict(value: &Value, host: Option<String>) -> Result<Self> {
        let mut space: Self = from_tagged_value(value, TYPE_NAME)?;
        space.host = host;
        Ok(space)
    }
}

impl HasIdentifier for Space {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::polygon::Polygon;

    fn square_at(x0: f64, side: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(x0, 0.0, 0.0),
            Point::new(x0 + side, 0.0, 0.0),
            Point::new(x0 + side, side, 0.0),
            Point::new(x0, side, 0.0),
        ])
        .unwrap()
    }

    fn volume_at(x0: f64, side: f64, height: f64) -> Volume {
        let floor = Floor::from_segment(FloorSegment::from_polygon("plate", square_at(x0, side)));
        Volume::new("vol", floor, height)
    }

    #[test]
    fn test_two_volume_space_totals() {
        let mut space = Space::new("Kitchen", "101");
        space.add_new_volumes(vec![volume_at(0.0, 10.0, 2.5), volume_at(10.0, 10.0, 2.5)]);
        assert!((space.floor_area() - 200.0).abs() < 1e-9);
        assert!((space.weighted_floor_area() - 200.0).abs() < 1e-9);
        assert!((space.avg_clear_height() - 2.5).abs() < 1e-9);
        assert!((space.net_volume() - 500.0).abs() < 1e-9);
        assert!((space.average_floor_weighting_factor() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_avg_clear_height_is_area_weighted() {
        let mut space = Space::new("Hall", "102");
        space.add_new_volumes(vec![volume_at(0.0, 10.0, 2.0), volume_at(10.0, 10.0, 1.0)]);
        assert!((space.avg_clear_height() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_space_defaults() {
        let space = Space::new("Empty", "000");
        assert_eq!(space.floor_area(), 0.0);
        assert_eq!(space.avg_clear_height(), 0.0);
        assert_eq!(space.average_floor_weighting_factor(), 1.0);
        assert_eq!(space.wufi_type, 99);
        assert_eq!(space.quantity, 1);
    }

    #[test]
    fn test_full_name() {
        let space = Space::new("Kitchen", "101");
        assert_eq!(space.full_name(), "101: Kitchen");
    }

    #[test]
    fn test_scale_to_feet() {
        // Metric model scaled to feet: areas go with the square,
        // volumes with the cube of the factor.
        let mut space = Space::new("Kitchen", "101");
        space.add_new_volumes(vec![volume_at(0.0, 10.0, 2.5), volume_at(10.0, 10.0, 2.5)]);
        let k = 3.28084;
        let scaled = space.scale(k, Point::new(0.0, 0.0, 0.0)).unwrap();
        assert!((scaled.floor_area() - 200.0 * k * k).abs() < 1e-6);
        assert!((scaled.avg_clear_height() - 2.5 * k).abs() < 1e-9);
        assert!((scaled.net_volume() - 500.0 * k * k * k).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_xy_moves_reference_points() {
        let mut space = Space::new("Kitchen", "101");
        space.add_new_volumes(vec![volume_at(0.0, 10.0, 2.5)]);
        let rotated = space.rotate_xy(90.0, Point::new(0.0, 0.0, 0.0)).unwrap();
        let pts = rotated.reference_points();
        assert_eq!(pts.len(), 1);
        assert!(pts[0].is_close(&Point::new(-5.0, 5.0, 0.0)));
    }

    #[test]
    fn test_duplicate_rehomes() {
        let mut space = Space::new("Kitchen", "101");
        space.host = Some("room_a".to_string());
        let copy = space.duplicate(Some("room_b"));
        assert_eq!(copy.host.as_deref(), Some("room_b"));
        assert_eq!(copy.identifier(), space.identifier());
        let plain = space.duplicate(None);
        assert_eq!(plain.host.as_deref(), Some("room_a"));
    }

    #[test]
    fn test_dict_round_trip_keeps_user_data() {
        let mut space = Space::new("Kitchen", "101");
        space.add_new_volumes(vec![volume_at(0.0, 10.0, 2.5)]);
        space
            .base
            .user_data
            .insert("note".to_string(), Value::from("south wing"));
        space.host = Some("room_a".to_string());
        let value = space.to_dict().unwrap();
        assert_eq!(value["type"], "Space");
        assert!(value.get("host").is_none());
        let back = Space::from_dict(&value, Some("room_a".to_string())).unwrap();
        assert_eq!(space, back);
    }

    #[test]
    fn test_to_dict_with_mesh_is_loadable() {
        let mut space = Space::new("Kitchen", "101");
        space.add_new_volumes(vec![volume_at(0.0, 10.0, 2.5)]);
        let value = space.to_dict_with_mesh().unwrap();
        assert!(value.get("mesh").is_some());
        let back = Space::from_dict(&value, None).unwrap();
        assert_eq!(back.name, "Kitchen");
        assert!((back.floor_area() - 100.0).abs() < 1e-9);
    }
}
