//! The WUFI project root.
//!
//! [`WufiProject::from_ph_model`] runs the whole translation:
//! constructions are deduplicated first, then each building segment
//! becomes a variant carrying its rooms' geometry, components and
//! zones plus the segment's climate and certification data. Rendering
//! afterwards walks the tree in the schema's sibling order.

use std::path::Path;

use anyhow::Result;

use crate::base::HasIdentifier;
use crate::certification::BuildingSegment;
use crate::model::Room;
use crate::properties::PhModel;
use crate::wufi::assembly::{AssemblyRegistry, WufiAssembly, WufiWindowType};
use crate::wufi::counter::IdCounters;
use crate::wufi::patterns::{OccupancyPattern, VentilationPattern};
use crate::wufi::variant::WufiVariant;
use crate::wufi::xml::{render, write_xml_file, ToXml, XmlNode};

pub const DATA_VERSION: i32 = 48;
pub const UNIT_SYSTEM_SI: i32 = 1;
pub const PROGRAM_VERSION: &str = "3.2.0.1";
pub const SCOPE: i32 = 3;
pub const DIMENSIONS_VISUALIZED_GEOMETRY: i32 = 2;

/// Free-text header block written into `ProjectData`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectData {
    pub customer_name: String,
    pub customer_street: String,
    pub customer_locality: String,
    pub customer_email: String,
    pub building_name: String,
    pub owner_is_client: bool,
    pub year_constructed: i32,
}

impl ToXml for ProjectData {
    fn to_xml(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("Year_Construction", self.year_constructed),
            XmlNode::leaf("OwnerIsClient", self.owner_is_client),
            XmlNode::leaf("Customer_Name", &self.customer_name),
            XmlNode::leaf("Customer_Street", &self.customer_street),
            XmlNode::leaf("Customer_Locality", &self.customer_locality),
            XmlNode::leaf("Customer_Email", &self.customer_email),
            XmlNode::leaf("Building_Name", &self.building_name),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WufiProject {
    pub project_data: ProjectData,
    pub ventilation_patterns: Vec<VentilationPattern>,
    pub occupancy_patterns: Vec<OccupancyPattern>,
    pub variants: Vec<WufiVariant>,
    pub assemblies: Vec<WufiAssembly>,
    pub window_types: Vec<WufiWindowType>,
}

impl WufiProject {
    /// Runs the full translation with a fresh set of id counters, so
    /// repeated calls produce identical documents.
    pub fn from_ph_model(ph_model: &PhModel) -> Result<Self> {
        let mut counters = IdCounters::new();
        let registry = AssemblyRegistry::build(&ph_model.model, &mut counters);

        let mut variants = Vec::new();
        for (segment, rooms) in rooms_by_segment(ph_model) {
            variants.push(WufiVariant::build(
                &segment,
                &rooms,
                ph_model,
                &registry,
                &mut counters,
            )?);
        }

        let (assemblies, window_types) = registry.into_parts();
        Ok(Self {
            project_data: ProjectData {
                building_name: ph_model.model.base.display_name.clone(),
                ..ProjectData::default()
            },
            ventilation_patterns: vec![VentilationPattern::default_pattern(1)],
            occupancy_patterns: vec![OccupancyPattern::default_pattern(1)],
            variants,
            assemblies,
            window_types,
        })
    }

    pub fn to_xml_string(&self) -> String {
        render("WUFIplusProject", &self.root_nodes())
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_xml_file(path, "WUFIplusProject", &self.root_nodes())
    }

    /// The root's children in their required order.
    fn root_nodes(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("DataVersion", DATA_VERSION),
            XmlNode::leaf("UnitSystem", UNIT_SYSTEM_SI),
            XmlNode::leaf("ProgramVersion", PROGRAM_VERSION),
            XmlNode::leaf("Scope", SCOPE),
            XmlNode::leaf("DimensionsVisualizedGeometry", DIMENSIONS_VISUALIZED_GEOMETRY),
            XmlNode::object("ProjectData", self.project_data.to_xml()),
            XmlNode::list(
                "UtilisationPatternsVentilation",
                self.ventilation_patterns
                    .iter()
                    .map(|p| XmlNode::object("UtilizationPatternVent", p.to_xml()))
                    .collect(),
            ),
            XmlNode::list(
                "UtilizationPatternsPH",
                self.occupancy_patterns
                    .iter()
                    .map(|p| XmlNode::object("UtilizationPattern", p.to_xml()))
                    .collect(),
            ),
            XmlNode::list(
                "Variants",
                self.variants
                    .iter()
                    .map(|v| XmlNode::object("Variant", v.to_xml()))
                    .collect(),
            ),
            XmlNode::list(
                "Assemblies",
                self.assemblies
                    .iter()
                    .map(|a| XmlNode::object("Assembly", a.to_xml()))
                    .collect(),
            ),
            XmlNode::list(
                "WindowTypes",
                self.window_types
                    .iter()
                    .map(|w| XmlNode::object("WindowType", w.to_xml()))
                    .collect(),
            ),
        ]
    }
}

/// Groups the model's rooms under their building segments, in segment
/// declaration order. Rooms without a segment reference, or naming an
/// unknown one, fall into the first segment; a model with no declared
/// segments gets a default one named after the model.
fn rooms_by_segment(ph_model: &PhModel) -> Vec<(BuildingSegment, Vec<&Room>)> {
    let segments = &ph_model.ph.model.building_segments;
    if segments.is_empty() {
        let fallback = BuildingSegment::new(&ph_model.model.base.display_name);
        return vec![(fallback, ph_model.model.rooms.iter().collect())];
    }
    let mut grouped: Vec<(BuildingSegment, Vec<&Room>)> =
        segments.iter().map(|s| (s.clone(), Vec::new())).collect();
    for room in &ph_model.model.rooms {
        let slot = ph_model
            .ph
            .get_room_ph(room.identifier())
            .and_then(|bag| bag.building_segment.as_deref())
            .and_then(|id| grouped.iter().position(|(s, _)| s.identifier() == id))
            .unwrap_or(0);
        grouped[slot].1.push(room);
    }
    grouped
}

/// Translates and writes in one step.
pub fn write_wufi_xml(ph_model: &PhModel, path: &Path) -> Result<()> {
    WufiProject::from_ph_model(ph_model)?.write(path)
}
