//! Closed solids bounded by polygon faces.

use crate::Point;
use crate::Vector;
use crate::geom::EPS;
use crate::geom::bboxes::bounding_box;
use crate::geom::polygon::Polygon;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

pub mod containment;

use containment::is_point_inside_solid;

/// Serialized form of a solid: one vertex loop per face.
#[derive(Serialize, Deserialize)]
struct SolidData {
    faces: Vec<Vec<Point>>,
}

/// A solid bounded by planar faces.
///
/// The faces are expected to enclose the volume and point outward, the way
/// room geometry arrives from the model. Neither is verified here; the
/// containment test copes with occasional gaps through its majority vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SolidData", into = "SolidData")]
pub struct Solid {
    faces: Vec<Polygon>,
}

impl Solid {
    /// Creates a solid from at least 4 faces.
    pub fn new(faces: Vec<Polygon>) -> Result<Self> {
        if faces.len() < 4 {
            return Err(anyhow!(
                "Solid needs at least 4 faces, got {}",
                faces.len()
            ));
        }
        Ok(Self { faces })
    }

    pub fn faces(&self) -> &[Polygon] {
        &self.faces
    }

    /// All face vertices, with duplicates at shared edges.
    pub fn vertices(&self) -> Vec<Point> {
        self.faces
            .iter()
            .flat_map(|f| f.vertices().iter().cloned())
            .collect()
    }

    pub fn bounding_box(&self) -> (Point, Point) {
        bounding_box(&self.vertices())
    }

    /// Volume from the divergence theorem over the face triangulations.
    ///
    /// The sign is dropped, so a consistently inward-facing solid still
    /// reports a positive volume.
    pub fn volume(&self) -> f64 {
        let origin = Point::new(0., 0., 0.);
        let mut six_v = 0.0;
        for face in &self.faces {
            let pts = face.vertices();
            for t in face.triangles() {
                let v1 = pts[t.0] - origin;
                let v2 = pts[t.1] - origin;
                let v3 = pts[t.2] - origin;
                six_v += v1.dot(&v2.cross(&v3));
            }
        }
        (six_v / 6.0).abs()
    }

    /// Checks if `ptest` lies inside the solid (ray casting, majority vote).
    pub fn is_point_inside(&self, ptest: Point) -> bool {
        is_point_inside_solid(self, ptest)
    }

    /// Moves the solid along `vec`.
    pub fn translate(&self, vec: &Vector) -> Self {
        Self {
            faces: self.faces.iter().map(|f| f.translate(vec)).collect(),
        }
    }

    /// Scales the solid uniformly about `origin`. The factor must be positive.
    pub fn scale(&self, factor: f64, origin: Point) -> Result<Self> {
        if factor < EPS {
            return Err(anyhow!("Scaling factor must be positive, got {}", factor));
        }
        let faces: Result<Vec<Polygon>> =
            self.faces.iter().map(|f| f.scale(factor, origin)).collect();
        Ok(Self { faces: faces? })
    }

    /// Rotates the solid by `phi` radians around `axis` through `origin`.
    pub fn rotate(&self, axis: &Vector, phi: f64, origin: Point) -> Result<Self> {
        let faces: Result<Vec<Polygon>> = self
            .faces
            .iter()
            .map(|f| f.rotate(axis, phi, origin))
            .collect();
        Ok(Self { faces: faces? })
    }

    /// Reflects the solid across the plane with `normal` through `origin`.
    pub fn reflect(&self, normal: &Vector, origin: Point) -> Result<Self> {
        let faces: Result<Vec<Polygon>> = self
            .faces
            .iter()
            .map(|f| f.reflect(normal, origin))
            .collect();
        Ok(Self { faces: faces? })
    }

    /// Axis-aligned box with one corner at `origin` and the opposite corner
    /// at `origin + (x, y, z)`. Faces point outward.
    pub fn from_box(x: f64, y: f64, z: f64, origin: Option<(f64, f64, f64)>) -> Result<Self> {
        let origin_vec = match origin {
            Some((dx, dy, dz)) => Vector::new(dx, dy, dz),
            None => Vector::new(0., 0., 0.),
        };

        let p0 = Point::new(0., 0., 0.) + origin_vec;
        let p1 = Point::new(x, 0., 0.) + origin_vec;
        let p2 = Point::new(x, y, 0.) + origin_vec;
        let p3 = Point::new(0., y, 0.) + origin_vec;
        let p4 = Point::new(0., 0., z) + origin_vec;
        let p5 = Point::new(x, 0., z) + origin_vec;
        let p6 = Point::new(x, y, z) + origin_vec;
        let p7 = Point::new(0., y, z) + origin_vec;

        let faces = vec![
            Polygon::new(vec![p0, p3, p2, p1])?, // floor, facing down
            Polygon::new(vec![p0, p1, p5, p4])?,
            Polygon::new(vec![p1, p2, p6, p5])?,
            Polygon::new(vec![p2, p3, p7, p6])?,
            Polygon::new(vec![p3, p0, p4, p7])?,
            Polygon::new(vec![p4, p5, p6, p7])?, // ceiling, facing up
        ];

        Self::new(faces)
    }
}

impl TryFrom<SolidData> for Solid {
    type Error = anyhow::Error;

    fn try_from(data: SolidData) -> Result<Self> {
        let faces: Result<Vec<Polygon>> = data.faces.into_iter().map(Polygon::new).collect();
        Solid::new(faces?)
    }
}

impl From<Solid> for SolidData {
    fn from(solid: Solid) -> Self {
        SolidData {
            faces: solid
                .faces
                .into_iter()
                .map(|f| f.vertices().to_vec())
                .collect(),
        }
    }
}
