//! Translation of a [`PhModel`](crate::properties::PhModel) into a
//! WUFI Passive project file.
//!
//! The translation runs in phases: constructions are deduplicated
//! into numbered assemblies and window types, then each building
//! segment becomes a variant whose rooms contribute shared vertices,
//! polygons, components and zones, and finally the tree is rendered
//! with every element in the order the WUFI schema expects. All
//! numbering lives in a per-run [`IdCounters`], so translating never
//! touches the model and repeated runs give identical output.

pub mod assembly;
pub mod component;
pub mod counter;
pub mod geometry;
pub mod patterns;
pub mod project;
pub mod variant;
pub mod xml;
pub mod zone;

pub use assembly::{AssemblyRegistry, WufiAssembly, WufiWindowType};
pub use component::WufiComponent;
pub use counter::IdCounters;
pub use geometry::{VertexCache, WufiPolygon, WufiVertex};
pub use patterns::{OccupancyPattern, VentilationPattern};
pub use project::{write_wufi_xml, ProjectData, WufiProject};
pub use variant::WufiVariant;
pub use xml::{ToXml, XmlNode};
pub use zone::WufiZone;
