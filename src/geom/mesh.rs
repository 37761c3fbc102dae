//! Triangle meshes assembled from polygon triangulations.

use crate::Point;
use crate::geom::polygon::Polygon;
use crate::geom::triangles::TriangleIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const SCALE: f64 = 1e9;

/// Quantizes a point to an integer key at 1e9 scale (≈ 1 nm precision).
/// Points mapping to the same key are treated as the same vertex.
pub(crate) fn quantize(p: &Point) -> (i64, i64, i64) {
    (
        (p.x * SCALE).round() as i64,
        (p.y * SCALE).round() as i64,
        (p.z * SCALE).round() as i64,
    )
}

/// A triangle mesh defined by vertices and face indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Point>,
    pub faces: Vec<TriangleIndex>,
}

impl Mesh {
    pub fn new(vertices: Vec<Point>, faces: Vec<TriangleIndex>) -> Self {
        Self { vertices, faces }
    }

    /// Collects the triangulations of several polygons into one mesh.
    ///
    /// Vertices shared between polygons are merged.
    pub fn from_polygons<'a>(polygons: impl IntoIterator<Item = &'a Polygon>) -> Self {
        let mut mesh = Mesh::new(Vec::new(), Vec::new());
        for poly in polygons {
            let offset = mesh.vertices.len();
            mesh.vertices.extend_from_slice(poly.vertices());
            mesh.faces.extend(
                poly.triangles()
                    .iter()
                    .map(|t| TriangleIndex(t.0 + offset, t.1 + offset, t.2 + offset)),
            );
        }
        mesh.deduplicate_vertices()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns a new mesh with duplicate vertices merged.
    ///
    /// Vertices are considered identical when they quantize to the same
    /// key at 1e9 scale. Face indices are remapped accordingly.
    pub fn deduplicate_vertices(self) -> Self {
        let mut key_map: HashMap<(i64, i64, i64), usize> = HashMap::new();
        let mut new_vertices: Vec<Point> = Vec::new();
        let mut old_to_new: Vec<usize> = Vec::with_capacity(self.vertices.len());

        for p in &self.vertices {
            let key = quantize(p);
            let new_idx = match key_map.get(&key) {
                Some(&idx) => idx,
                None => {
                    let idx = new_vertices.len();
                    new_vertices.push(*p);
                    key_map.insert(key, idx);
                    idx
                }
            };
            old_to_new.push(new_idx);
        }

        let new_faces: Vec<TriangleIndex> = self
            .faces
            .iter()
            .map(|t| TriangleIndex(old_to_new[t.0], old_to_new[t.1], old_to_new[t.2]))
            .collect();

        Self {
            vertices: new_vertices,
            faces: new_faces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Solid;

    #[test]
    fn test_box_mesh_dedup() {
        // A box produces 6 quads → 12 triangles → 24 vertices (4 per face),
        // but only 8 unique corners.
        let solid = Solid::from_box(1.0, 1.0, 1.0, None).unwrap();
        let mesh = Mesh::from_polygons(solid.faces());
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
    }

    #[test]
    fn test_dedup_index_validity() {
        let solid = Solid::from_box(2.0, 3.0, 4.0, None).unwrap();
        let mesh = Mesh::from_polygons(solid.faces());
        let vc = mesh.vertex_count();
        for tri in &mesh.faces {
            assert!(tri.0 < vc);
            assert!(tri.1 < vc);
            assert!(tri.2 < vc);
        }
    }

    #[test]
    fn test_mesh_serde_roundtrip() -> anyhow::Result<()> {
        let solid = Solid::from_box(1.0, 1.0, 1.0, None).unwrap();
        let mesh = Mesh::from_polygons(solid.faces());
        let json = serde_json::to_string(&mesh)?;
        let mesh2: Mesh = serde_json::from_str(&json)?;
        assert_eq!(mesh, mesh2);
        Ok(())
    }
}
