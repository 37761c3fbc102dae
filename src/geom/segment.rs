//! Line segments in 3D space.
//!
//! `LineSegment` is the geometry carried by pipe and duct segments.
//! The free functions support polygon crossing tests and closest-point
//! queries used elsewhere in the geometry layer.

use crate::Point;
use crate::Vector;
use crate::geom::EPS;
use crate::geom::polygon::Polygon;
use crate::geom::transform::{reflect_points, rotate_points_about, scale_points, translate_points};
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// A straight segment between two points.
///
/// Zero-length segments are allowed. They appear as placeholder piping with
/// no run of their own, e.g. a trunk synthesized around a single branch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl LineSegment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).length()
    }

    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
            (self.start.z + self.end.z) / 2.0,
        )
    }

    /// Unit vector from start to end. Fails for a zero-length segment.
    pub fn direction(&self) -> Result<Vector> {
        (self.end - self.start).normalize()
    }

    /// Moves the segment along `vec`.
    pub fn translate(&self, vec: &Vector) -> Self {
        let pts = translate_points(&[self.start, self.end], vec);
        Self::new(pts[0], pts[1])
    }

    /// Scales the segment uniformly about `origin`. The factor must be positive.
    pub fn scale(&self, factor: f64, origin: Point) -> Result<Self> {
        if factor < EPS {
            return Err(anyhow!("Scaling factor must be positive, got {}", factor));
        }
        let pts = scale_points(&[self.start, self.end], factor, origin);
        Ok(Self::new(pts[0], pts[1]))
    }

    /// Rotates the segment by `phi` radians around `axis` through `origin`.
    pub fn rotate(&self, axis: &Vector, phi: f64, origin: Point) -> Result<Self> {
        let u = axis.normalize()?;
        let pts = rotate_points_about(&[self.start, self.end], &u, phi, origin);
        Ok(Self::new(pts[0], pts[1]))
    }

    /// Reflects the segment across the plane with `normal` through `origin`.
    pub fn reflect(&self, normal: &Vector, origin: Point) -> Result<Self> {
        let n = normal.normalize()?;
        let pts = reflect_points(&[self.start, self.end], &n, origin);
        Ok(Self::new(pts[0], pts[1]))
    }
}

/// Checks if a line segment crosses a polygon.
///
/// A segment crosses a polygon if it intersects the polygon's plane and
/// the intersection point lies inside the polygon (boundary included).
///
/// Returns `Some(Point)` with the intersection point if crossing occurs,
/// `None` otherwise. A segment lying in the polygon's plane counts as
/// crossing only when one of its endpoints is inside the polygon.
pub fn segment_crosses_polygon(
    seg_start: Point,
    seg_end: Point,
    polygon: &Polygon,
) -> Option<Point> {
    let (a, b, c, d) = polygon.plane_coefficients();
    let vn = polygon.normal();

    // Signed distances from segment endpoints to the plane
    let dist_start = a * seg_start.x + b * seg_start.y + c * seg_start.z + d;
    let dist_end = a * seg_end.x + b * seg_end.y + c * seg_end.z + d;

    // Entirely on one side of the plane
    if dist_start > EPS && dist_end > EPS {
        return None;
    }
    if dist_start < -EPS && dist_end < -EPS {
        return None;
    }

    // Segment lies in the plane
    if dist_start.abs() < EPS && dist_end.abs() < EPS {
        if polygon.is_point_inside(seg_start, true) {
            return Some(seg_start);
        }
        if polygon.is_point_inside(seg_end, true) {
            return Some(seg_end);
        }
        return None;
    }

    // Segment crosses the plane. Find the intersection point from the
    // parametric form P = seg_start + t * (seg_end - seg_start).
    let seg_vec = seg_end - seg_start;
    let denom = vn.dot(&seg_vec);
    if denom.abs() < EPS {
        return None;
    }
    let t = -dist_start / denom;
    if !(-EPS..=1.0 + EPS).contains(&t) {
        return None;
    }

    let intersection = Point::new(
        seg_start.x + t * seg_vec.dx,
        seg_start.y + t * seg_vec.dy,
        seg_start.z + t * seg_vec.dz,
    );

    if polygon.is_point_inside(intersection, true) {
        Some(intersection)
    } else {
        None
    }
}

/// Finds the closest point on a segment to a given point.
///
/// The segment is defined by two endpoints p1 and p2.
pub fn closest_point_on_segment(pt: Point, p1: Point, p2: Point) -> Point {
    let seg_vec = p2 - p1;
    let pt_vec = pt - p1;

    let seg_len_sq = seg_vec.dot(&seg_vec);

    if seg_len_sq < EPS * EPS {
        // Segment is a point
        return p1;
    }

    let t = (pt_vec.dot(&seg_vec) / seg_len_sq).clamp(0.0, 1.0);

    Point::new(
        p1.x + t * seg_vec.dx,
        p1.y + t * seg_vec.dy,
        p1.z + t * seg_vec.dz,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::IsClose;

    #[test]
    fn test_segment_length_and_midpoint() {
        let seg = LineSegment::new(Point::new(0., 0., 0.), Point::new(3., 4., 0.));
        assert!(seg.length().is_close(5.0));
        assert!(seg.midpoint().is_close(&Point::new(1.5, 2.0, 0.)));
    }

    #[test]
    fn test_zero_length_segment() {
        let seg = LineSegment::new(Point::new(1., 1., 1.), Point::new(1., 1., 1.));
        assert!(seg.length().is_close(0.0));
        assert!(seg.direction().is_err());
    }

    #[test]
    fn test_segment_translate_and_scale() -> Result<()> {
        let seg = LineSegment::new(Point::new(0., 0., 0.), Point::new(1., 0., 0.));
        let moved = seg.translate(&Vector::new(0., 1., 0.));
        assert!(moved.start.is_close(&Point::new(0., 1., 0.)));

        let scaled = seg.scale(2.0, Point::new(0., 0., 0.))?;
        assert!(scaled.length().is_close(2.0));
        Ok(())
    }

    #[test]
    fn test_segment_rotate() -> Result<()> {
        let seg = LineSegment::new(Point::new(0., 0., 0.), Point::new(1., 0., 0.));
        let rotated = seg.rotate(
            &Vector::new(0., 0., 1.),
            std::f64::consts::PI / 2.,
            Point::new(0., 0., 0.),
        )?;
        assert!(rotated.end.is_close(&Point::new(0., 1., 0.)));
        assert!(rotated.length().is_close(1.0));
        Ok(())
    }

    #[test]
    fn test_segment_serde_roundtrip() -> Result<()> {
        let seg = LineSegment::new(Point::new(0., 0., 0.), Point::new(1., 2., 3.));
        let json = serde_json::to_string(&seg)?;
        let seg2: LineSegment = serde_json::from_str(&json)?;
        assert_eq!(seg, seg2);
        Ok(())
    }

    #[test]
    fn test_segment_crosses_polygon() -> Result<()> {
        let polygon = Polygon::new(vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ])?;

        // Segment that crosses through the center
        let result = segment_crosses_polygon(
            Point::new(0.5, 0.5, -1.0),
            Point::new(0.5, 0.5, 1.0),
            &polygon,
        );
        assert!(result.is_some());
        assert!(result.unwrap().is_close(&Point::new(0.5, 0.5, 0.0)));

        Ok(())
    }

    #[test]
    fn test_segment_misses_polygon() -> Result<()> {
        let polygon = Polygon::new(vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ])?;

        // Crosses the plane outside the boundary
        let result = segment_crosses_polygon(
            Point::new(2.0, 2.0, -1.0),
            Point::new(2.0, 2.0, 1.0),
            &polygon,
        );
        assert!(result.is_none());

        // Parallel to the plane, above it
        let result = segment_crosses_polygon(
            Point::new(0.0, 0.5, 1.0),
            Point::new(1.0, 0.5, 1.0),
            &polygon,
        );
        assert!(result.is_none());

        Ok(())
    }

    #[test]
    fn test_segment_touches_polygon_edge() -> Result<()> {
        let polygon = Polygon::new(vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ])?;

        let result = segment_crosses_polygon(
            Point::new(0.5, 0.0, -1.0),
            Point::new(0.5, 0.0, 1.0),
            &polygon,
        );
        assert!(result.is_some());

        Ok(())
    }

    #[test]
    fn test_closest_point_on_segment() {
        let p1 = Point::new(0.0, 0.0, 0.0);
        let p2 = Point::new(2.0, 0.0, 0.0);

        // Point above segment
        let closest = closest_point_on_segment(Point::new(1.0, 1.0, 0.0), p1, p2);
        assert!(closest.is_close(&Point::new(1.0, 0.0, 0.0)));

        // Point beyond segment, clamps to endpoint
        let closest = closest_point_on_segment(Point::new(5.0, 1.0, 0.0), p1, p2);
        assert!(closest.is_close(&Point::new(2.0, 0.0, 0.0)));
    }
}
