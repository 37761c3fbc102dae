//! Point-in-polygon testing over a triangulated polygon.

use crate::Point;
use crate::Vector;
use crate::geom::EPS;
use crate::geom::triangles::{TriangleIndex, is_point_inside_triangle};

/// Checks if a point lies inside a polygon.
///
/// The polygon is given as its vertices `pts`, triangulation `tri`, and
/// normal `vn`. `boundary_in` decides whether points on an edge or a
/// vertex count as inside. Points off the polygon's plane are outside.
pub fn is_point_inside_polygon(
    ptest: Point,
    pts: &[Point],
    tri: &[TriangleIndex],
    vn: &Vector,
    boundary_in: bool,
) -> bool {
    if !is_point_on_plane(ptest, pts, vn) {
        return false;
    }
    if is_point_on_boundary(ptest, pts) {
        return boundary_in;
    }
    tri.iter()
        .any(|t| is_point_inside_triangle(ptest, pts[t.0], pts[t.1], pts[t.2]))
}

/// Distance of `ptest` from the polygon's plane along the normal,
/// checked against the crate tolerance.
fn is_point_on_plane(ptest: Point, pts: &[Point], vn: &Vector) -> bool {
    if pts.is_empty() {
        return false;
    }
    let offset = Vector::from_points(pts[0], ptest);
    vn.dot(&offset).abs() < EPS
}

/// Checks if a point lies on the boundary of the polygon (vertices or edges).
pub fn is_point_on_boundary(ptest: Point, pts: &[Point]) -> bool {
    if pts.len() < 2 {
        return false;
    }
    if pts.iter().any(|p| ptest.is_close(p)) {
        return true;
    }
    (0..pts.len()).any(|i| ptest.is_on_segment(pts[i], pts[(i + 1) % pts.len()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::triangles::triangulate;

    fn vertical_wall() -> (Vec<Point>, Vec<TriangleIndex>, Vector) {
        // 4 x 3 wall in the xz-plane facing -y
        let pts = vec![
            Point::new(0., 0., 0.),
            Point::new(4., 0., 0.),
            Point::new(4., 0., 3.),
            Point::new(0., 0., 3.),
        ];
        let vn = Vector::new(0., -1., 0.);
        let (pts, tri) = triangulate(pts, vn, 0).unwrap();
        (pts, tri, vn)
    }

    #[test]
    fn test_interior_point() {
        let (pts, tri, vn) = vertical_wall();
        let inside = Point::new(2., 0., 1.5);
        assert!(is_point_inside_polygon(inside, &pts, &tri, &vn, true));
        assert!(is_point_inside_polygon(inside, &pts, &tri, &vn, false));
    }

    #[test]
    fn test_point_off_plane_or_beside() {
        let (pts, tri, vn) = vertical_wall();
        // In the plane but past the edge
        assert!(!is_point_inside_polygon(
            Point::new(5., 0., 1.),
            &pts,
            &tri,
            &vn,
            true
        ));
        // Straight in front of the wall
        assert!(!is_point_inside_polygon(
            Point::new(2., -1., 1.5),
            &pts,
            &tri,
            &vn,
            true
        ));
    }

    #[test]
    fn test_boundary_follows_flag() {
        let (pts, tri, vn) = vertical_wall();
        let corner = Point::new(0., 0., 0.);
        let bottom_edge = Point::new(2., 0., 0.);
        let side_edge = Point::new(4., 0., 1.5);
        for ptest in [corner, bottom_edge, side_edge] {
            assert!(is_point_inside_polygon(ptest, &pts, &tri, &vn, true));
            assert!(!is_point_inside_polygon(ptest, &pts, &tri, &vn, false));
        }
    }

    #[test]
    fn test_concave_cutout_is_outside() {
        let pts = vec![
            Point::new(0., 0., 0.),
            Point::new(3., 0., 0.),
            Point::new(3., 1., 0.),
            Point::new(1., 1., 0.),
            Point::new(1., 3., 0.),
            Point::new(0., 3., 0.),
        ];
        let vn = Vector::new(0., 0., 1.);
        let (pts, tri) = triangulate(pts, vn, 0).unwrap();

        // Both arms of the L
        assert!(is_point_inside_polygon(
            Point::new(0.5, 2.0, 0.),
            &pts,
            &tri,
            &vn,
            true
        ));
        assert!(is_point_inside_polygon(
            Point::new(2.0, 0.5, 0.),
            &pts,
            &tri,
            &vn,
            true
        ));
        // The notch
        assert!(!is_point_inside_polygon(
            Point::new(2.0, 2.0, 0.),
            &pts,
            &tri,
            &vn,
            true
        ));
    }
}
