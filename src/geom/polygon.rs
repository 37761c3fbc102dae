//! Planar polygon with eager triangulation.
//!
//! The polygon stores its vertices, unit normal, and ear-clip triangulation.
//! The normal follows the winding of the vertices (counter-clockwise when
//! looking against the normal). Transform methods return new instances.

use crate::Point;
use crate::Vector;
use crate::geom::EPS;
use crate::geom::point::check::{are_points_collinear, are_points_coplanar};
use crate::geom::projection::PlaneBasis;
use crate::geom::rotation::rotate_points_around_vector;
use crate::geom::segment::closest_point_on_segment;
use crate::geom::transform::{reflect_points, rotate_points_about, scale_points, translate_points};
use crate::geom::triangles::{TriangleIndex, triangulate};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

pub mod containment;
pub mod merge;

use containment::is_point_inside_polygon;

/// Serialized form of a polygon. Only the vertices are stored; the normal
/// and triangulation are recomputed on load.
#[derive(Serialize, Deserialize)]
struct PolygonData {
    points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonData", into = "PolygonData")]
pub struct Polygon {
    pts: Vec<Point>,
    vn: Vector,
    tri: Vec<TriangleIndex>,
}

impl Polygon {
    /// Creates a polygon from at least 3 coplanar, non-collinear points.
    ///
    /// The facing direction is taken from the vertex winding using the
    /// Newell method, so the caller does not pass a normal explicitly.
    pub fn new(pts: Vec<Point>) -> Result<Self> {
        if pts.len() < 3 {
            return Err(anyhow!("Polygon needs at least 3 points, got {}", pts.len()));
        }
        if are_points_collinear(&pts) {
            return Err(anyhow!("Polygon points are collinear"));
        }
        if !are_points_coplanar(&pts) {
            return Err(anyhow!("Polygon points are not coplanar"));
        }
        let vn = newell_vector(&pts)
            .normalize()
            .context("Polygon is degenerate (zero area)")?;
        let (pts, tri) = triangulate(pts, vn, 0)?;

        Ok(Self { pts, vn, tri })
    }

    /// Builds a polygon from already validated parts (used by transforms).
    fn with_parts(pts: Vec<Point>, vn: Vector, tri: Vec<TriangleIndex>) -> Self {
        Self { pts, vn, tri }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.pts
    }

    pub fn normal(&self) -> Vector {
        self.vn
    }

    pub fn triangles(&self) -> &[TriangleIndex] {
        &self.tri
    }

    /// Consecutive vertex pairs, wrapping around to the first vertex.
    pub fn edges(&self) -> Vec<(Point, Point)> {
        let n = self.pts.len();
        (0..n).map(|i| (self.pts[i], self.pts[(i + 1) % n])).collect()
    }

    /// Polygon area from the magnitude of the Newell vector.
    pub fn area(&self) -> f64 {
        newell_vector(&self.pts).length() / 2.0
    }

    /// Area-weighted centroid. Correct also for non-convex polygons,
    /// where the vertex mean could fall outside the boundary.
    pub fn centroid(&self) -> Point {
        let mut total_area = 0.0;
        let (mut cx, mut cy, mut cz) = (0.0, 0.0, 0.0);
        for t in &self.tri {
            let (p1, p2, p3) = (self.pts[t.0], self.pts[t.1], self.pts[t.2]);
            let area = (p2 - p1).cross(&(p3 - p1)).length() / 2.0;
            cx += (p1.x + p2.x + p3.x) / 3.0 * area;
            cy += (p1.y + p2.y + p3.y) / 3.0 * area;
            cz += (p1.z + p2.z + p3.z) / 3.0 * area;
            total_area += area;
        }
        if total_area < EPS {
            // Degenerate, fall back to the vertex mean
            let n = self.pts.len() as f64;
            let sx: f64 = self.pts.iter().map(|p| p.x).sum();
            let sy: f64 = self.pts.iter().map(|p| p.y).sum();
            let sz: f64 = self.pts.iter().map(|p| p.z).sum();
            return Point::new(sx / n, sy / n, sz / n);
        }
        Point::new(cx / total_area, cy / total_area, cz / total_area)
    }

    /// Coefficients (a, b, c, d) of the plane equation `ax + by + cz + d = 0`.
    pub fn plane_coefficients(&self) -> (f64, f64, f64, f64) {
        let p0 = self.pts[0];
        let d = -(self.vn.dx * p0.x + self.vn.dy * p0.y + self.vn.dz * p0.z);
        (self.vn.dx, self.vn.dy, self.vn.dz, d)
    }

    /// Checks if `ptest` lies within the polygon.
    ///
    /// Points on the boundary count as inside only when `boundary_in` is true.
    pub fn is_point_inside(&self, ptest: Point, boundary_in: bool) -> bool {
        is_point_inside_polygon(ptest, &self.pts, &self.tri, &self.vn, boundary_in)
    }

    /// Returns the boundary point closest to `ptest`.
    pub fn nearest_boundary_point(&self, ptest: Point) -> Point {
        let mut best = self.pts[0];
        let mut best_dist = f64::MAX;
        for (pa, pb) in self.edges() {
            let candidate = closest_point_on_segment(ptest, pa, pb);
            let dist = ptest.distance_to(&candidate);
            if dist < best_dist {
                best_dist = dist;
                best = candidate;
            }
        }
        best
    }

    /// Returns a copy with reversed winding and flipped normal.
    pub fn flip(&self) -> Self {
        let n = self.pts.len();
        let pts: Vec<Point> = self.pts.iter().rev().cloned().collect();
        let tri = self
            .tri
            .iter()
            .map(|t| TriangleIndex(n - 1 - t.2, n - 1 - t.1, n - 1 - t.0))
            .collect();
        Self::with_parts(pts, -self.vn, tri)
    }

    /// Moves the polygon along `vec`.
    pub fn translate(&self, vec: &Vector) -> Self {
        let pts = translate_points(&self.pts, vec);
        Self::with_parts(pts, self.vn, self.tri.clone())
    }

    /// Scales the polygon uniformly about `origin`. The factor must be positive.
    pub fn scale(&self, factor: f64, origin: Point) -> Result<Self> {
        if factor < EPS {
            return Err(anyhow!("Scaling factor must be positive, got {}", factor));
        }
        let pts = scale_points(&self.pts, factor, origin);
        Ok(Self::with_parts(pts, self.vn, self.tri.clone()))
    }

    /// Rotates the polygon by `phi` radians around `axis` through `origin`.
    pub fn rotate(&self, axis: &Vector, phi: f64, origin: Point) -> Result<Self> {
        let u = axis.normalize()?;
        let pts = rotate_points_about(&self.pts, &u, phi, origin);
        let vn = rotate_vector(&self.vn, &u, phi);
        Ok(Self::with_parts(pts, vn, self.tri.clone()))
    }

    /// Reflects the polygon across the plane with `normal` through `origin`.
    ///
    /// Reflection reverses the winding, so the stored normal flips along
    /// with its mirror image to stay consistent with the vertex order.
    pub fn reflect(&self, normal: &Vector, origin: Point) -> Result<Self> {
        let n = normal.normalize()?;
        let pts = reflect_points(&self.pts, &n, origin);
        let mirrored = self.vn - n * (2.0 * self.vn.dot(&n));
        Ok(Self::with_parts(pts, -mirrored, self.tri.clone()))
    }

    /// Offsets each edge inward by its own distance and rebuilds the polygon
    /// from the intersections of adjacent offset edges.
    ///
    /// `dists` must have one entry per edge (edge `i` runs from vertex `i`
    /// to vertex `i + 1`). Fails when adjacent edges are parallel or the
    /// offsets collapse the polygon.
    pub fn inset_edges(&self, dists: &[f64]) -> Result<Self> {
        let n = self.pts.len();
        if dists.len() != n {
            return Err(anyhow!("Expected {} edge offsets, got {}", n, dists.len()));
        }
        let basis = PlaneBasis::from_normal(self.pts[0], self.vn)
            .ok_or_else(|| anyhow!("Cannot build a plane basis for the polygon"))?;
        let pts2d: Vec<(f64, f64)> = self.pts.iter().map(|p| basis.project(*p)).collect();

        // Shift each edge line inward (left of travel for counter-clockwise
        // winding), then intersect consecutive shifted lines.
        let mut lines: Vec<(f64, f64, f64, f64)> = Vec::with_capacity(n);
        for i in 0..n {
            let (x0, y0) = pts2d[i];
            let (x1, y1) = pts2d[(i + 1) % n];
            let (ex, ey) = (x1 - x0, y1 - y0);
            let len = (ex * ex + ey * ey).sqrt();
            if len < EPS {
                return Err(anyhow!("Degenerate edge in polygon"));
            }
            let (ex, ey) = (ex / len, ey / len);
            lines.push((x0 - ey * dists[i], y0 + ex * dists[i], ex, ey));
        }
        let mut new_pts = Vec::with_capacity(n);
        for i in 0..n {
            let (px, py, pex, pey) = lines[(i + n - 1) % n];
            let (qx, qy, qex, qey) = lines[i];
            let denom = pex * qey - pey * qex;
            if denom.abs() < EPS {
                return Err(anyhow!("Cannot offset edges meeting at a straight angle"));
            }
            let t = ((qx - px) * qey - (qy - py) * qex) / denom;
            new_pts.push(basis.unproject(px + pex * t, py + pey * t));
        }
        Polygon::new(new_pts).context("Edge offsets degenerate the polygon")
    }
}

impl TryFrom<PolygonData> for Polygon {
    type Error = anyhow::Error;

    fn try_from(data: PolygonData) -> Result<Self> {
        Polygon::new(data.points)
    }
}

impl From<Polygon> for PolygonData {
    fn from(poly: Polygon) -> Self {
        PolygonData { points: poly.pts }
    }
}

/// Newell vector of a vertex loop. Its direction is the surface normal for
/// the given winding and its magnitude is twice the polygon area.
fn newell_vector(pts: &[Point]) -> Vector {
    let mut vn = Vector::new(0., 0., 0.);
    let n = pts.len();
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        vn.dx += (a.y - b.y) * (a.z + b.z);
        vn.dy += (a.z - b.z) * (a.x + b.x);
        vn.dz += (a.x - b.x) * (a.y + b.y);
    }
    vn
}

/// Rotates a direction vector by `phi` radians around the unit axis `u`.
fn rotate_vector(v: &Vector, u: &Vector, phi: f64) -> Vector {
    let as_point = Point::new(v.dx, v.dy, v.dz);
    let rotated = rotate_points_around_vector(&[as_point], u, phi);
    Vector::new(rotated[0].x, rotated[0].y, rotated[0].z)
}
