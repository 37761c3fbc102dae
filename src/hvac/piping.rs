//! Hot-water distribution piping.
//!
//! The hierarchy runs Trunk > Branch > Fixture, where fixtures and the
//! runs of trunks and branches are all [`PipeElement`]s built from
//! [`PipeSegment`]s. Geometry lives in model units; pipe diameters and
//! insulation thicknesses are always millimetres and are never touched
//! by geometric scaling.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{from_tagged_value, tagged_value, BaseData, HasIdentifier};
use crate::geom::point::Point;
use crate::geom::segment::LineSegment;
use crate::geom::vector::Vector;

pub const DEFAULT_WATER_TEMP_C: f64 = 60.0;
pub const DEFAULT_DAILY_PERIOD_H: f64 = 24.0;
pub const DEFAULT_DIAMETER_MM: f64 = 12.7;

/// Pipe material, numbered the way the WUFI schema numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipeMaterial {
    CopperM,
    CopperL,
    CopperK,
    Ferrous,
    PvcCpvc,
    Pex,
    Cpvc,
}

impl PipeMaterial {
    pub fn as_wufi_code(&self) -> i32 {
        match self {
            Self::CopperM => 1,
            Self::CopperL => 2,
            Self::CopperK => 3,
            Self::Ferrous => 4,
            Self::PvcCpvc => 5,
            Self::Pex => 6,
            Self::Cpvc => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CopperM => "COPPER_M",
            Self::CopperL => "COPPER_L",
            Self::CopperK => "COPPER_K",
            Self::Ferrous => "FERROUS",
            Self::PvcCpvc => "PVC_CPVC",
            Self::Pex => "PEX",
            Self::Cpvc => "CPVC",
        }
    }
}

impl Default for PipeMaterial {
    fn default() -> Self {
        Self::CopperM
    }
}

fn default_diameter_mm() -> f64 {
    DEFAULT_DIAMETER_MM
}

fn default_conductivity() -> f64 {
    0.04
}

fn default_reflective() -> bool {
    true
}

fn default_daily_period() -> f64 {
    DEFAULT_DAILY_PERIOD_H
}

fn default_water_temp() -> f64 {
    DEFAULT_WATER_TEMP_C
}

/// One straight run of pipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSegment {
    #[serde(flatten)]
    pub base: BaseData,
    pub geometry: LineSegment,
    #[serde(default = "default_diameter_mm")]
    pub diameter_mm: f64,
    #[serde(default)]
    pub insulation_thickness_mm: f64,
    #[serde(default = "default_conductivity")]
    pub insulation_conductivity: f64,
    #[serde(default = "default_reflective")]
    pub insulation_reflective: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insulation_quality: Option<String>,
    #[serde(default = "default_daily_period")]
    pub daily_period: f64,
    #[serde(default = "default_water_temp")]
    pub water_temp_c: f64,
    #[serde(default)]
    pub material: PipeMaterial,
}

impl PipeSegment {
    pub fn new(display_name: &str, geometry: LineSegment) -> Self {
        Self {
            base: BaseData::new(display_name),
            geometry,
            diameter_mm: DEFAULT_DIAMETER_MM,
            insulation_thickness_mm: 0.0,
            insulation_conductivity: 0.04,
            insulation_reflective: true,
            insulation_quality: None,
            daily_period: DEFAULT_DAILY_PERIOD_H,
            water_temp_c: DEFAULT_WATER_TEMP_C,
            material: PipeMaterial::default(),
        }
    }

    pub fn length(&self) -> f64 {
        self.geometry.length()
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

    /// Scales the geometry only. Diameter and insulation stay in mm.
    pub fn scale(&self, factor: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            geometry: self.geometry.scale(factor, origin)?,
            ..self.clone()
        })
    }

    pub fn rotate(&self, axis: &Vector, angle_deg: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            geometry: self.geometry.rotate(axis, angle_deg.to_radians(), origin)?,
            ..self.clone()
        })
    }

    pub fn reflect(&self, normal: &Vector, origin: Point) -> Result<Self> {
        Ok(Self {
            geometry: self.geometry.reflect(normal, origin)?,
            ..self.clone()
        })
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "PipeSegment")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "PipeSegment")
    }
}

impl HasIdentifier for PipeSegment {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

/// An ordered run of pipe segments.
///
/// Aggregate values are weighted by segment length. An element with
/// no length falls back to the standard defaults (60 degC water for
/// 24 h/day) so that empty placeholder elements stay harmless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeElement {
    #[serde(flatten)]
    pub base: BaseData,
    #[serde(default)]
    pub segments: Vec<PipeSegment>,
}

impl PipeElement {
    pub fn new(display_name: &str) -> Self {
        Self {
            base: BaseData::new(display_name),
            segments: Vec::new(),
        }
    }

    pub fn from_segments(display_name: &str, segments: Vec<PipeSegment>) -> Self {
        Self {
            base: BaseData::new(display_name),
            segments,
        }
    }

    pub fn add_segment(&mut self, segment: PipeSegment) {
        self.segments.push(segment);
    }

    pub fn length(&self) -> f64 {
        self.segments.iter().map(PipeSegment::length).sum()
    }

    pub fn water_temp_c(&self) -> f64 {
        self.length_weighted(|s| s.water_temp_c, DEFAULT_WATER_TEMP_C)
    }

    pub fn daily_period(&self) -> f64 {
        self.length_weighted(|s| s.daily_period, DEFAULT_DAILY_PERIOD_H)
    }

    pub fn diameter_mm(&self) -> f64 {
        self.length_weighted(|s| s.diameter_mm, DEFAULT_DIAMETER_MM)
    }

    /// The material shared by all segments.
    ///
    /// Mixed materials have no single name, so an element mixing them
    /// reports an error instead of guessing.
    pub fn material_name(&self) -> Result<&'static str> {
        let mut found: Option<PipeMaterial> = None;
        for segment in &self.segments {
            match found {
                None => found = Some(segment.material),
                Some(m) if m == segment.material => {}
                Some(m) => {
                    return Err(anyhow!(
                        "pipe element {} mixes materials: {} and {}",
                        self.base.display_name,
                        m.name(),
                        segment.material.name()
                    ))
                }
            }
        }
        found
            .map(|m| m.name())
            .ok_or_else(|| anyhow!("pipe element {} has no segments", self.base.display_name))
    }

    fn length_weighted(&self, value: impl Fn(&PipeSegment) -> f64, default: f64) -> f64 {
        let total = self.length();
        if total <= 0.0 {
            return default;
        }
        let weighted: f64 = self.segments.iter().map(|s| s.length() * value(s)).sum();
        weighted / total
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            segments: self.segments.iter().map(PipeSegment::duplicate).collect(),
        }
    }

    pub fn translate(&self, vec: &Vector) -> Self {
        Self {
            base: self.base.clone(),
            segments: self.segments.iter().map(|s| s.translate(vec)).collect(),
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
        })
    }

    pub fn reflect(&self, normal: &Vector, origin: Point) -> Result<Self> {
        Ok(Self {
            base: self.base.clone(),
            segments: self
                .segments
                .iter()
                .map(|s| s.reflect(normal, origin))
                .collect::<Result<_>>()?,
        })
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "PipeElement")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "PipeElement")
    }
}

impl HasIdentifier for PipeElement {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

/// A branch: its own pipe run plus the fixture ("twig") elements
/// served from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeBranch {
    #[serde(flatten)]
    pub base: BaseData,
    pub pipe_element: PipeElement,
    #[serde(default)]
    pub fixtures: Vec<PipeElement>,
}

impl PipeBranch {
    pub fn new(display_name: &str, pipe_element: PipeElement) -> Self {
        Self {
            base: BaseData::new(display_name),
            pipe_element,
            fixtures: Vec::new(),
        }
    }

    pub fn add_fixture(&mut self, fixture: PipeElement) {
        self.fixtures.push(fixture);
    }

    /// Length of the branch's own run, fixtures excluded.
    pub fn length(&self) -> f64 {
        self.pipe_element.length()
    }

    /// Branch run plus all fixture runs.
    pub fn total_length(&self) -> f64 {
        self.length() + self.fixtures.iter().map(PipeElement::length).sum::<f64>()
    }

    /// Sum over fixtures of the home-run distance branch + fixture.
    pub fn total_home_run_fixture_length(&self) -> f64 {
        self.fixtures
            .iter()
            .map(|f| self.length() + f.length())
            .sum()
    }

    pub fn num_fixtures(&self) -> usize {
        self.fixtures.len()
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            pipe_element: self.pipe_element.duplicate(),
            fixtures: self.fixtures.iter().map(PipeElement::duplicate).collect(),
        }
    }

    pub fn translate(&self, vec: &Vector) -> Self {
        Self {
            base: self.base.clone(),
            pipe_element: self.pipe_element.translate(vec),
            fixtures: self.fixtures.iter().map(|f| f.translate(vec)).collect(),
        }
    }

    pub fn scale(&self, factor: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            base: self.base.clone(),
            pipe_element: self.pipe_element.scale(factor, origin)?,
            fixtures: self
                .fixtures
                .iter()
                .map(|f| f.scale(factor, origin))
                .collect::<Result<_>>()?,
        })
    }

    pub fn rotate(&self, axis: &Vector, angle_deg: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            base: self.base.clone(),
            pipe_element: self.pipe_element.rotate(axis, angle_deg, origin)?,
            fixtures: self
                .fixtures
                .iter()
                .map(|f| f.rotate(axis, angle_deg, origin))
                .collect::<Result<_>>()?,
        })
    }

    pub fn reflect(&self, normal: &Vector, origin: Point) -> Result<Self> {
        Ok(Self {
            base: self.base.clone(),
            pipe_element: self.pipe_element.reflect(normal, origin)?,
            fixtures: self
                .fixtures
                .iter()
                .map(|f| f.reflect(normal, origin))
                .collect::<Result<_>>()?,
        })
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "PipeBranch")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "PipeBranch")
    }
}

impl HasIdentifier for PipeBranch {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

fn default_multiplier() -> i32 {
    1
}

/// A trunk: its own pipe run plus the branches served from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeTrunk {
    #[serde(flatten)]
    pub base: BaseData,
    pub pipe_element: PipeElement,
    #[serde(default)]
    pub branches: Vec<PipeBranch>,
    #[serde(default = "default_multiplier")]
    pub multiplier: i32,
    #[serde(default)]
    pub demand_recirculation: bool,
}

impl PipeTrunk {
    pub fn new(display_name: &str, pipe_element: PipeElement) -> Self {
        Self {
            base: BaseData::new(display_name),
            pipe_element,
            branches: Vec::new(),
            multiplier: 1,
            demand_recirculation: false,
        }
    }

    pub fn add_branch(&mut self, branch: PipeBranch) {
        self.branches.push(branch);
    }

    /// Length of the trunk's own run, branches excluded.
    pub fn length(&self) -> f64 {
        self.pipe_element.length()
    }

    /// Trunk run plus all branch totals.
    pub fn total_length(&self) -> f64 {
        self.length()
            + self
                .branches
                .iter()
                .map(PipeBranch::total_length)
                .sum::<f64>()
    }

    /// Sum over branches of trunk + branch home-run distances.
    pub fn total_home_run_fixture_length(&self) -> f64 {
        self.branches
            .iter()
            .map(|b| self.length() + b.total_home_run_fixture_length())
            .sum()
    }

    pub fn num_fixtures(&self) -> usize {
        self.branches.iter().map(PipeBranch::num_fixtures).sum()
    }

    pub fn duplicate(&self) -> Self {
        Self {
            base: self.base.duplicate(),
            pipe_element: self.pipe_element.duplicate(),
            branches: self.branches.iter().map(PipeBranch::duplicate).collect(),
            multiplier: self.multiplier,
            demand_recirculation: self.demand_recirculation,
        }
    }

    pub fn translate(&self, vec: &Vector) -> Self {
        Self {
            base: self.base.clone(),
            pipe_element: self.pipe_element.translate(vec),
            branches: self.branches.iter().map(|b| b.translate(vec)).collect(),
            ..self.clone()
        }
    }

    pub fn scale(&self, factor: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            base: self.base.clone(),
            pipe_element: self.pipe_element.scale(factor, origin)?,
            branches: self
                .branches
                .iter()
                .map(|b| b.scale(factor, origin))
                .collect::<Result<_>>()?,
            ..self.clone()
        })
    }

    pub fn rotate(&self, axis: &Vector, angle_deg: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            base: self.base.clone(),
            pipe_element: self.pipe_element.rotate(axis, angle_deg, origin)?,
            branches: self
                .branches
                .iter()
                .map(|b| b.rotate(axis, angle_deg, origin))
                .collect::<Result<_>>()?,
            ..self.clone()
        })
    }

    pub fn reflect(&self, normal: &Vector, origin: Point) -> Result<Self> {
        Ok(Self {
            base: self.base.clone(),
            pipe_element: self.pipe_element.reflect(normal, origin)?,
            branches: self
                .branches
                .iter()
                .map(|b| b.reflect(normal, origin))
                .collect::<Result<_>>()?,
            ..self.clone()
        })
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "PipeTrunk")
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        from_tagged_value(value, "PipeTrunk")
    }
}

impl HasIdentifier for PipeTrunk {
    fn identifier(&self) -> &str {
        &self.base.identifier
    }
}

/// A lone branch becomes a trunk with an empty (zero-length) run, so
/// callers can hand piping over at whatever level they modelled it.
impl From<PipeBranch> for PipeTrunk {
    fn from(branch: PipeBranch) -> Self {
        let name = branch.base.display_name.clone();
        let mut trunk = PipeTrunk::new(&name, PipeElement::new(&name));
        trunk.add_branch(branch);
        trunk
    }
}

/// A lone fixture element becomes a single-fixture branch with an
/// empty run.
impl From<PipeElement> for PipeBranch {
    fn from(fixture: PipeElement) -> Self {
        let name = fixture.base.display_name.clone();
        let mut branch = PipeBranch::new(&name, PipeElement::new(&name));
        branch.add_fixture(fixture);
        branch
    }
}

impl From<PipeElement> for PipeTrunk {
    fn from(fixture: PipeElement) -> Self {
        PipeBranch::from(fixture).into()
    }
}
