//! Building components: one per face and per aperture, linking a
//! polygon, a construction reference and the host zone.

use crate::model::{Aperture, BoundaryCondition, Face, FaceType};
use crate::wufi::assembly::AssemblyRegistry;
use crate::wufi::counter::IdCounters;
use crate::wufi::xml::{ToXml, XmlNode};

/// WUFI `Type` codes.
pub const TYPE_OPAQUE: i32 = 1;
pub const TYPE_TRANSPARENT: i32 = 2;
pub const TYPE_AIR_BOUNDARY: i32 = 3;

/// WUFI `OuterAttachment` codes.
pub const ATTACH_OUTDOORS: i32 = -1;
pub const ATTACH_GROUND: i32 = -2;
pub const ATTACH_SURFACE: i32 = -3;

const COLOR_WINDOW: i32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct WufiComponent {
    pub id_num: u32,
    pub name: String,
    pub component_type: i32,
    pub color_interior: i32,
    pub color_exterior: i32,
    /// id_num of the zone the component bounds.
    pub inner_attachment: u32,
    pub outer_attachment: i32,
    pub assembly_id: Option<u32>,
    pub window_type_id: Option<u32>,
    pub polygon_ids: Vec<u32>,
}

impl WufiComponent {
    pub fn from_face(
        face: &Face,
        polygon_id: u32,
        zone_id: u32,
        registry: &AssemblyRegistry,
        counters: &mut IdCounters,
    ) -> Self {
        let (color_interior, color_exterior) =
            color_codes(face.face_type, &face.boundary_condition);
        Self {
            id_num: counters.next_component(),
            name: face.base.display_name.clone(),
            component_type: match face.face_type {
                FaceType::AirBoundary => TYPE_AIR_BOUNDARY,
                _ => TYPE_OPAQUE,
            },
            color_interior,
            color_exterior,
            inner_attachment: zone_id,
            outer_attachment: outer_attachment(&face.boundary_condition),
            assembly_id: face
                .construction
                .as_deref()
                .and_then(|c| registry.assembly_id(c)),
            window_type_id: None,
            polygon_ids: vec![polygon_id],
        }
    }

    pub fn from_aperture(
        aperture: &Aperture,
        polygon_id: u32,
        zone_id: u32,
        registry: &AssemblyRegistry,
        counters: &mut IdCounters,
    ) -> Self {
        Self {
            id_num: counters.next_component(),
            name: aperture.base.display_name.clone(),
            component_type: TYPE_TRANSPARENT,
            color_interior: COLOR_WINDOW,
            color_exterior: COLOR_WINDOW,
            inner_attachment: zone_id,
            outer_attachment: outer_attachment(&aperture.boundary_condition),
            assembly_id: None,
            window_type_id: aperture
                .construction
                .as_deref()
                .and_then(|c| registry.window_type_id(c)),
            polygon_ids: vec![polygon_id],
        }
    }
}

pub fn outer_attachment(bc: &BoundaryCondition) -> i32 {
    match bc {
        BoundaryCondition::Outdoors => ATTACH_OUTDOORS,
        BoundaryCondition::Ground => ATTACH_GROUND,
        // Adiabatic faces attach like interior surfaces.
        BoundaryCondition::Surface { .. } | BoundaryCondition::Adiabatic => ATTACH_SURFACE,
    }
}

/// WUFI display colors, (interior, exterior), keyed by what the
/// surface is and what it touches.
fn color_codes(face_type: FaceType, bc: &BoundaryCondition) -> (i32, i32) {
    match (face_type, bc) {
        (FaceType::Wall, BoundaryCondition::Outdoors) => (1, 2),
        (FaceType::Wall, BoundaryCondition::Ground) => (1, 12),
        (FaceType::Wall, _) => (3, 3),
        (FaceType::RoofCeiling, BoundaryCondition::Outdoors) => (10, 11),
        (FaceType::RoofCeiling, BoundaryCondition::Ground) => (10, 12),
        (FaceType::RoofCeiling, _) => (6, 6),
        (FaceType::Floor, BoundaryCondition::Ground) => (5, 12),
        (FaceType::Floor, BoundaryCondition::Outdoors) => (5, 2),
        (FaceType::Floor, _) => (5, 5),
        (FaceType::AirBoundary, _) => (3, 3),
    }
}

fn reference(id: Option<u32>) -> i64 {
    id.map(|v| i64::from(v)).unwrap_or(-1)
}

impl ToXml for WufiComponent {
    fn to_xml(&self) -> Vec<XmlNode> {
        // -1 marks the unused construction slot.
        vec![
            XmlNode::leaf("IdentNr", self.id_num),
            XmlNode::leaf("Name", &self.name),
            XmlNode::leaf("Visual", true),
            XmlNode::leaf("Type", self.component_type),
            XmlNode::leaf("IdentNrColorInterior", self.color_interior),
            XmlNode::leaf("IdentNrColorExterior", self.color_exterior),
            XmlNode::leaf("InnerAttachment", self.inner_attachment),
            XmlNode::leaf("OuterAttachment", self.outer_attachment),
            XmlNode::leaf("IdentNrAssembly", reference(self.assembly_id)),
            XmlNode::leaf("IdentNrWindowType", reference(self.window_type_id)),
            XmlNode::list(
                "IdentNrPolygons",
                self.polygon_ids
                    .iter()
                    .map(|id| XmlNode::leaf("IdentNr", id))
                    .collect(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point::Point;
    use crate::geom::polygon::Polygon;
    use crate::wufi::xml::render;

    fn ground_floor_face() -> Face {
        // Downward normal, classified as a ground-coupled floor.
        Face::new(
            "slab",
            Polygon::new(vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
                Point::new(1.0, 1.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_outer_attachment_codes() {
        assert_eq!(outer_attachment(&BoundaryCondition::Outdoors), -1);
        assert_eq!(outer_attachment(&BoundaryCondition::Ground), -2);
        assert_eq!(
            outer_attachment(&BoundaryCondition::Surface {
                boundary_condition_object: "other_face".to_string()
            }),
            -3
        );
        assert_eq!(outer_attachment(&BoundaryCondition::Adiabatic), -3);
    }

    #[test]
    fn test_ground_floor_component() {
        let face = ground_floor_face();
        let registry = AssemblyRegistry::default();
        let mut counters = IdCounters::new();
        let component = WufiComponent::from_face(&face, 7, 1, &registry, &mut counters);

        assert_eq!(component.id_num, 1);
        assert_eq!(component.component_type, TYPE_OPAQUE);
        assert_eq!(component.outer_attachment, ATTACH_GROUND);
        assert_eq!((component.color_interior, component.color_exterior), (5, 12));
        assert_eq!(component.polygon_ids, vec![7]);
    }

    #[test]
    fn test_unreferenced_constructions_write_minus_one() {
        let face = ground_floor_face();
        let registry = AssemblyRegistry::default();
        let mut counters = IdCounters::new();
        let component = WufiComponent::from_face(&face, 7, 1, &registry, &mut counters);
        let doc = render("Root", &[XmlNode::object("Component", component.to_xml())]);

        assert!(doc.contains("<IdentNrAssembly>-1</IdentNrAssembly>"));
        assert!(doc.contains("<IdentNrWindowType>-1</IdentNrWindowType>"));
        assert!(doc.contains("<InnerAttachment>1</InnerAttachment>"));
        assert!(doc.contains("<OuterAttachment>-2</OuterAttachment>"));
    }

    #[test]
    fn test_aperture_component_is_transparent() {
        let window = Polygon::new(vec![
            Point::new(0.2, 0.0, 0.2),
            Point::new(0.8, 0.0, 0.2),
            Point::new(0.8, 0.0, 0.8),
            Point::new(0.2, 0.0, 0.8),
        ])
        .unwrap();
        let aperture = Aperture::new("win", window);
        let registry = AssemblyRegistry::default();
        let mut counters = IdCounters::new();
        let component =
            WufiComponent::from_aperture(&aperture, 3, 2, &registry, &mut counters);

        assert_eq!(component.component_type, TYPE_TRANSPARENT);
        assert_eq!(component.outer_attachment, ATTACH_OUTDOORS);
        assert_eq!(component.inner_attachment, 2);
        assert_eq!(component.color_interior, 4);
    }
}
