//! The base building-model contract: rooms, faces, apertures, shades
//! and construction catalogs.
//!
//! This is the subset of an HBJSON-style energy model that the
//! Passive House layer consumes. Faces carry their polygon, type and
//! boundary condition; constructions live in model-level catalogs and
//! are referenced by identifier.

pub mod hbjson;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};
use crate::envelope::{WindowFrame, WindowGlazing};
use crate::geom::polygon::Polygon;
use crate::geom::solid::Solid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceType {
    Wall,
    Floor,
    RoofCeiling,
    AirBoundary,
}

impl FaceType {
    /// Classifies a face by the tilt of its outward normal: steep
    /// normals are floors or ceilings, everything else is a wall.
    pub fn from_normal(normal: &crate::geom::vector::Vector) -> Self {
        if normal.dz > 0.7 {
            Self::RoofCeiling
        } else if normal.dz < -0.7 {
            Self::Floor
        } else {
            Self::Wall
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoundaryCondition {
    Outdoors,
    Ground,
    /// Touching another face; the value is that face's identifier.
    Surface { boundary_condition_object: String },
    Adiabatic,
}

fn default_layer_conductivity() -> f64 {
    1.0
}

fn default_layer_density() -> f64 {
    2000.0
}

fn default_layer_specific_heat() -> f64 {
    900.0
}

/// One material layer of an opaque construction, outside in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstructionLayer {
    pub thickness_m: f64,
    #[serde(default = "default_layer_conductivity")]
    pub conductivity: f64,
    #[serde(default = "default_layer_density")]
    pub density: f64,
    #[serde(default = "default_layer_specific_heat")]
    pub specific_heat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueConstruction {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default)]
    pub layers: Vec<ConstructionLayer>,
}

impl OpaqueConstruction {
    pub fn new(display_name: &str, layers: Vec<ConstructionLayer>) -> Self {
        Self {
            base: BaseData::new(display_name),
            layers,
        }
    }
}

impl HasIdentifier for OpaqueConstruction {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

/// An aperture construction: frame plus glazing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConstruction {
    #[serde(flatten)]
    pub base: BaseData,
    pub frame: WindowFrame,
    pub glazing: WindowGlazing,
}

impl WindowConstruction {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            frame: WindowFrame::new(display_name),
            glazing: WindowGlazing::new(display_name),
        }
    }
}

impl HasIdentifier for WindowConstruction {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aperture {
    #[serde(flatten)]
    pub base: BaseData,
    pub geometry: Polygon,
    #[serde(default = "default_outdoors")]
    pub boundary_condition: BoundaryCondition,
    /// Identifier of a [`WindowConstruction`] in the model catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction: Option<String>,
}

fn default_outdoors() -> BoundaryCondition {
    BoundaryCondition::Outdoors
}

impl Aperture {
    pub fn new(display_name: &str, geometry: Polygon) -> Self {
        Self {
            base: BaseData::new(display_name),
            geometry,
            boundary_condition: BoundaryCondition::Outdoors,
            construction: None,
        }
    }
}

impl HasIdentifier for Aperture {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    #[serde(flatten)]
    pub base: BaseData,
    pub geometry: Polygon,
    pub face_type: FaceType,
    pub boundary_condition: BoundaryCondition,
    /// Identifier of an [`OpaqueConstruction`] in the model catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction: Option<String>,
    #[serde(default)]
    pub apertures: Vec<Aperture>,
}

impl Face {
    pub fn new(display_name: &str, geometry: Polygon) -> Self {
        let face_type = FaceType::from_normal(&geometry.normal());
        let boundary_condition = match face_type {
            FaceType::Floor => BoundaryCondition::Ground,
            _ => BoundaryCondition::Outdoors,
        };
        Self {
            base: BaseData::new(display_name),
            geometry,
            face_type,
            boundary_condition,
            construction: None,
            apertures: Vec::new(),
        }
    }

    pub fn add_aperture(&mut self, aperture: Aperture) {
        self.apertures.push(aperture);
    }
}

impl HasIdentifier for Face {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

/// Freestanding shading geometry (overhangs, fins, context buildings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shade {
    #[serde(flatten)]
    pub base: BaseData,
    pub geometry: Polygon,
}

impl Shade {
    pub fn new(display_name: &str, geometry: Polygon) -> Self {
        Self {
            base: BaseData::new(display_name),
            geometry,
        }
    }
}

impl HasIdentifier for Shade {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

/// Service hot-water load. A room must carry one before hot-water
/// piping can be assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceHotWater {
    /// Total design draw in litres per day.
    pub flow_l_per_day: f64,
}

fn default_multiplier() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default)]
    pub faces: Vec<Face>,
    #[serde(default = "default_multiplier")]
    pub multiplier: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_hot_water: Option<ServiceHotWater>,
}

impl Room {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            faces: Vec::new(),
            multiplier: 1,
            service_hot_water: None,
        }
    }

    /// Builds a room from a closed solid, classifying each face by its
    /// normal. Down-facing faces become ground-coupled floors.
    pub fn from_solid(display_name: &str, solid: Solid) -> Result<Self> {
        let mut room = Self::new(display_name);
        for (i, polygon) in solid.faces().iter().enumerate() {
            let name = format!("{}_face_{}", display_name, i);
            room.faces.push(Face::new(&name, polygon.clone()));
        }
        Ok(room)
    }

    /// The closed shell of the room.
    pub fn solid(&self) -> Result<Solid> {
        Solid::new(self.faces.iter().map(|f| f.geometry.clone()).collect())
            .with_context(|| format!("room {} faces do not form a solid", self.base.display_name))
    }

    /// Gross interior volume from the shell.
    pub fn volume(&self) -> Result<f64> {
        Ok(self.solid()?.volume())
    }

    pub fn apertures(&self) -> impl Iterator<Item = &Aperture> {
        self.faces.iter().flat_map(|f| f.apertures.iter())
    }
}

impl HasIdentifier for Room {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

fn default_units() -> String {
    "Meters".to_string()
}

fn default_tolerance() -> f64 {
    0.01
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default = "default_units")]
    pub units: String,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub orphaned_shades: Vec<Shade>,
    #[serde(default)]
    pub opaque_constructions: Vec<OpaqueConstruction>,
    #[serde(default)]
    pub window_constructions: Vec<WindowConstruction>,
}

impl Model {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            units: "Meters".to_string(),
            tolerance: 0.01,
            rooms: Vec::new(),
            orphaned_shades: Vec::new(),
            opaque_constructions: Vec::new(),
            window_constructions: Vec::new(),
        }
    }

    pub fn room(&self, identifier: &str) -> Result<&Room> {
        self.rooms
            .iter()
            .find(|r| r.identifier() == identifier)
            .ok_or_else(|| anyhow!("model has no room with identifier {}", identifier))
    }

    pub fn opaque_construction(&self, identifier: &str) -> Option<&OpaqueConstruction> {
        self.opaque_constructions
            .iter()
            .find(|c| c.identifier() == identifier)
    }

    pub fn window_construction(&self, identifier: &str) -> Option<&WindowConstruction> {
        self.window_constructions
            .iter()
            .find(|c| c.identifier() == identifier)
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "Model")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "Model")
    }
}

impl HasIdentifier for Model {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}
