//! Opaque-construction assemblies and window types, deduplicated by
//! construction identifier before any geometry is written so the
//! components can reference them by `id_num`.

use std::collections::BTreeMap;

use crate::base::HasIdentifier;
use crate::model::{Model, OpaqueConstruction, WindowConstruction};
use crate::wufi::counter::IdCounters;
use crate::wufi::xml::{ToXml, XmlNode};

/// Maps construction identifiers to allocated id_nums and keeps the
/// deduplicated records in allocation order.
#[derive(Debug, Default)]
pub struct AssemblyRegistry {
    assemblies: Vec<WufiAssembly>,
    window_types: Vec<WufiWindowType>,
    assembly_ids: BTreeMap<String, u32>,
    window_type_ids: BTreeMap<String, u32>,
}

impl AssemblyRegistry {
    /// Walks every face and aperture once, allocating an id_num for
    /// each catalog construction the first time it is referenced.
    /// References to constructions missing from the catalog are left
    /// unresolved; the component then writes a -1 reference.
    pub fn build(model: &Model, counters: &mut IdCounters) -> Self {
        let mut registry = Self::default();
        for room in &model.rooms {
            for face in &room.faces {
                if let Some(identifier) = face.construction.as_deref() {
                    if let Some(construction) = model.opaque_construction(identifier) {
                        registry.add_assembly(construction, counters);
                    }
                }
                for aperture in &face.apertures {
                    if let Some(identifier) = aperture.construction.as_deref() {
                        if let Some(construction) = model.window_construction(identifier) {
                            registry.add_window_type(construction, counters);
                        }
                    }
                }
            }
        }
        registry
    }

    fn add_assembly(&mut self, construction: &OpaqueConstruction, counters: &mut IdCounters) {
        if self.assembly_ids.contains_key(construction.identifier()) {
            return;
        }
        let id_num = counters.next_assembly();
        self.assembly_ids
            .insert(construction.identifier().to_string(), id_num);
        self.assemblies.push(WufiAssembly::build(construction, id_num));
    }

    fn add_window_type(&mut self, construction: &WindowConstruction, counters: &mut IdCounters) {
        if self.window_type_ids.contains_key(construction.identifier()) {
            return;
        }
        let id_num = counters.next_window_type();
        self.window_type_ids
            .insert(construction.identifier().to_string(), id_num);
        self.window_types
            .push(WufiWindowType::build(construction, id_num));
    }

    pub fn assembly_id(&self, identifier: &str) -> Option<u32> {
        self.assembly_ids.get(identifier).copied()
    }

    pub fn window_type_id(&self, identifier: &str) -> Option<u32> {
        self.window_type_ids.get(identifier).copied()
    }

    pub fn assemblies(&self) -> &[WufiAssembly] {
        &self.assemblies
    }

    pub fn window_types(&self) -> &[WufiWindowType] {
        &self.window_types
    }

    pub fn into_parts(self) -> (Vec<WufiAssembly>, Vec<WufiWindowType>) {
        (self.assemblies, self.window_types)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WufiLayer {
    pub thickness_m: f64,
    pub conductivity: f64,
    pub density: f64,
    pub specific_heat: f64,
}

impl ToXml for WufiLayer {
    fn to_xml(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("Thickness", self.thickness_m),
            XmlNode::object(
                "Material",
                vec![
                    XmlNode::leaf("Name", ""),
                    XmlNode::leaf("ThermalConductivity", self.conductivity),
                    XmlNode::leaf("BulkDensity", self.density),
                    XmlNode::leaf("HeatCapacity", self.specific_heat),
                ],
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WufiAssembly {
    pub id_num: u32,
    pub name: String,
    pub layers: Vec<WufiLayer>,
}

impl WufiAssembly {
    fn build(construction: &OpaqueConstruction, id_num: u32) -> Self {
        Self {
            id_num,
            name: construction.base.display_name.clone(),
            layers: construction
                .layers
                .iter()
                .map(|layer| WufiLayer {
                    thickness_m: layer.thickness_m,
                    conductivity: layer.conductivity,
                    density: layer.density,
                    specific_heat: layer.specific_heat,
                })
                .collect(),
        }
    }
}

impl ToXml for WufiAssembly {
    fn to_xml(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("IdentNr", self.id_num),
            XmlNode::leaf("Name", &self.name),
            // 2 = layers listed outside to inside.
            XmlNode::leaf("Order_Layers", 2),
            XmlNode::leaf("Grouping_Layers", 2),
            XmlNode::list(
                "Layers",
                self.layers
                    .iter()
                    .map(|layer| XmlNode::object("Layer", layer.to_xml()))
                    .collect(),
            ),
        ]
    }
}

/// Frame parameters run Left, Right, Bottom, Top, matching the order
/// of the `Frame_*` elements in the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct WufiWindowType {
    pub id_num: u32,
    pub name: String,
    pub u_value_glazing: f64,
    pub g_value: f64,
    pub frame_widths: [f64; 4],
    pub frame_u_values: [f64; 4],
    pub psi_glazing: [f64; 4],
    pub psi_install: [f64; 4],
}

impl WufiWindowType {
    fn build(construction: &WindowConstruction, id_num: u32) -> Self {
        let frame = &construction.frame;
        let edges = [&frame.left, &frame.right, &frame.bottom, &frame.top];
        Self {
            id_num,
            name: construction.base.display_name.clone(),
            u_value_glazing: construction.glazing.u_value,
            g_value: construction.glazing.g_value,
            frame_widths: edges.map(|e| e.width),
            frame_u_values: edges.map(|e| e.u_value),
            psi_glazing: edges.map(|e| e.psi_glazing),
            psi_install: edges.map(|e| e.psi_install),
        }
    }
}

impl ToXml for WufiWindowType {
    fn to_xml(&self) -> Vec<XmlNode> {
        let [width_l, width_r, width_b, width_t] = self.frame_widths;
        let [u_l, u_r, u_b, u_t] = self.frame_u_values;
        let [psi_g_l, psi_g_r, psi_g_b, psi_g_t] = self.psi_glazing;
        let [psi_i_l, psi_i_r, psi_i_b, psi_i_t] = self.psi_install;
        vec![
            XmlNode::leaf("IdentNr", self.id_num),
            XmlNode::leaf("Name", &self.name),
            XmlNode::leaf("Uw_Detailed", true),
            XmlNode::leaf("GlazingFrameDetailed", true),
            XmlNode::leaf("U_Value_Glazing", self.u_value_glazing),
            XmlNode::leaf("g_Value", self.g_value),
            XmlNode::leaf("Frame_Width_Left", width_l),
            XmlNode::leaf("Frame_Width_Right", width_r),
            XmlNode::leaf("Frame_Width_Bottom", width_b),
            XmlNode::leaf("Frame_Width_Top", width_t),
            XmlNode::leaf("Frame_U_Left", u_l),
            XmlNode::leaf("Frame_U_Right", u_r),
            XmlNode::leaf("Frame_U_Bottom", u_b),
            XmlNode::leaf("Frame_U_Top", u_t),
            XmlNode::leaf("Glazing_Psi_Left", psi_g_l),
            XmlNode::leaf("Glazing_Psi_Right", psi_g_r),
            XmlNode::leaf("Glazing_Psi_Bottom", psi_g_b),
            XmlNode::leaf("Glazing_Psi_Top", psi_g_t),
            XmlNode::leaf("Install_Psi_Left", psi_i_l),
            XmlNode::leaf("Install_Psi_Right", psi_i_r),
            XmlNode::leaf("Install_Psi_Bottom", psi_i_b),
            XmlNode::leaf("Install_Psi_Top", psi_i_t),
        ]
    }
}
