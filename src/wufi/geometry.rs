//! WUFI geometry records: the per-variant vertex cache and polygon
//! nodes.

use std::collections::BTreeMap;

use crate::geom::point::Point;
use crate::geom::polygon::Polygon;
use crate::geom::vector::Vector;
use crate::wufi::counter::IdCounters;
use crate::wufi::xml::{ToXml, XmlNode};

/// Coordinates closer than this share one WUFI vertex.
const VERTEX_QUANTUM: f64 = 1e-6;

/// Allocates one `id_num` per distinct vertex position. Scoped to a
/// variant, like the `Graphics_3D` block the vertices are written
/// into.
#[derive(Debug, Default)]
pub struct VertexCache {
    ids: BTreeMap<(i64, i64, i64), u32>,
    vertices: Vec<WufiVertex>,
}

impl VertexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_for(&mut self, point: &Point, counters: &mut IdCounters) -> u32 {
        let key = (quantize(point.x), quantize(point.y), quantize(point.z));
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }
        let id_num = counters.next_vertex();
        self.ids.insert(key, id_num);
        self.vertices.push(WufiVertex {
            id_num,
            x: point.x,
            y: point.y,
            z: point.z,
        });
        id_num
    }

    /// Vertices in allocation order.
    pub fn vertices(&self) -> &[WufiVertex] {
        &self.vertices
    }
}

fn quantize(coord: f64) -> i64 {
    (coord / VERTEX_QUANTUM).round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WufiVertex {
    pub id_num: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ToXml for WufiVertex {
    fn to_xml(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("IdentNr", self.id_num),
            XmlNode::leaf("X", self.x),
            XmlNode::leaf("Y", self.y),
            XmlNode::leaf("Z", self.z),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WufiPolygon {
    pub id_num: u32,
    pub normal: Vector,
    pub vertex_ids: Vec<u32>,
    /// Polygons cut out of this one: windows in their wall.
    pub child_polygon_ids: Vec<u32>,
}

impl WufiPolygon {
    pub fn from_polygon(
        polygon: &Polygon,
        cache: &mut VertexCache,
        counters: &mut IdCounters,
    ) -> Self {
        let id_num = counters.next_polygon();
        let vertex_ids = polygon
            .vertices()
            .iter()
            .map(|p| cache.id_for(p, counters))
            .collect();
        Self {
            id_num,
            normal: polygon.normal(),
            vertex_ids,
            child_polygon_ids: Vec::new(),
        }
    }
}

impl ToXml for WufiPolygon {
    fn to_xml(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("IdentNr", self.id_num),
            XmlNode::leaf("NormalVectorX", self.normal.dx),
            XmlNode::leaf("NormalVectorY", self.normal.dy),
            XmlNode::leaf("NormalVectorZ", self.normal.dz),
            XmlNode::list(
                "IdentNrPoints",
                self.vertex_ids
                    .iter()
                    .map(|id| XmlNode::leaf("IdentNr", id))
                    .collect(),
            ),
            XmlNode::list(
                "IdentNrPolygonsInside",
                self.child_polygon_ids
                    .iter()
                    .map(|id| XmlNode::leaf("IdentNr", id))
                    .collect(),
            ),
        ]
    }
}
