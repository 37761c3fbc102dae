//! Ear-clipping triangulation shared by polygons and meshes.

use crate::Point;
use crate::geom::EPS;
use crate::geom::IsClose;
use crate::geom::bboxes::is_point_inside_bbox;
use crate::geom::point::check::are_points_collinear;
use crate::geom::point::check::is_point_on_same_side;
use crate::geom::vector::Vector;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Vertex indices of one triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriangleIndex(pub usize, pub usize, pub usize);

/// Triangulates the polygon defined by `pts` and the normal `vn`.
///
/// Ear clipping over counter-clockwise input. If a full sweep finds no
/// ear the winding is assumed wrong, so the points are reversed and the
/// algorithm retried once.
pub fn triangulate(
    mut pts: Vec<Point>,
    vn: Vector,
    num_try: usize,
) -> Result<(Vec<Point>, Vec<TriangleIndex>)> {
    if num_try >= 2 {
        return Err(anyhow!("Ear-clipping algorithm failed."));
    }
    if vn.length().is_close(0.) {
        return Err(anyhow!("Normal vector cannot have zero length"));
    }

    let mut remaining: Vec<usize> = (0..pts.len()).collect();
    let mut triangles: Vec<TriangleIndex> = Vec::new();
    let mut cursor: usize = 0;
    let mut rejected: usize = 0;

    while remaining.len() > 2 {
        if rejected > pts.len() {
            // No ear found in a full sweep, assume clockwise input
            pts.reverse();
            return triangulate(pts, vn, num_try + 1);
        }
        if cursor >= remaining.len() {
            cursor = 0;
        }

        let before = if cursor == 0 {
            remaining.len() - 1
        } else {
            cursor - 1
        };
        let after = if cursor == remaining.len() - 1 {
            0
        } else {
            cursor + 1
        };
        let (ia, ib, ic) = (remaining[before], remaining[cursor], remaining[after]);

        if corner_is_convex(&pts[ia], &pts[ib], &pts[ic], &vn)
            && !holds_other_vertex(&pts, &remaining, ia, ib, ic)
        {
            triangles.push(TriangleIndex(ia, ib, ic));
            remaining.remove(cursor);
        } else {
            rejected += 1;
            cursor += 1;
        }
    }

    Ok((pts, triangles))
}

/// True when a vertex other than the corner's own lies inside the
/// candidate ear. Keeps concave polygons from clipping across a notch.
fn holds_other_vertex(
    pts: &[Point],
    remaining: &[usize],
    ia: usize,
    ib: usize,
    ic: usize,
) -> bool {
    remaining
        .iter()
        .copied()
        .filter(|&ix| ix != ia && ix != ib && ix != ic)
        .any(|ix| is_point_inside_triangle(pts[ix], pts[ia], pts[ib], pts[ic]))
}

/// Checks that the interior angle at `p2` is below 180 degrees, i.e.
/// the cross product of the two edges points the same way as `vn`.
/// Collinear corners count as non-convex.
///
/// # Panics
/// Panics if `vn` is not unit length.
fn corner_is_convex(p1: &Point, p2: &Point, p3: &Point, vn: &Vector) -> bool {
    assert!((vn.length() - 1.0).abs() < EPS);

    let lead = *p2 - *p1;
    let trail = *p3 - *p2;
    match lead.cross(&trail).normalize() {
        Ok(n) => n.is_close(vn),
        Err(_) => false,
    }
}

/// Tests if `ptest` lies inside the triangle `(p1, p2, p3)`.
///
/// Same-side half-plane tests after a bounding-box reject, described at
/// https://blackpawn.com/texts/pointinpoly/
/// Coplanarity of `ptest` with the triangle is the caller's problem.
pub fn is_point_inside_triangle(ptest: Point, p1: Point, p2: Point, p3: Point) -> bool {
    if !is_point_inside_bbox(ptest, &[p1, p2, p3]) {
        return false;
    }
    if ptest.is_close(&p1) || ptest.is_close(&p2) || ptest.is_close(&p3) {
        return true;
    }
    // On an edge counts as inside, on the extension of one does not
    for (pa, pb) in [(p1, p2), (p2, p3), (p3, p1)] {
        if are_points_collinear(&[pa, pb, ptest]) {
            return ptest.x <= pa.x.max(pb.x) + EPS
                && ptest.y <= pa.y.max(pb.y) + EPS
                && ptest.z <= pa.z.max(pb.z) + EPS
                && ptest.x >= pa.x.min(pb.x) - EPS
                && ptest.y >= pa.y.min(pb.y) - EPS
                && ptest.z >= pa.z.min(pb.z) - EPS;
        }
    }

    is_point_on_same_side(p1, p2, ptest, p3).unwrap_or(false)
        && is_point_on_same_side(p2, p3, ptest, p1).unwrap_or(false)
        && is_point_on_same_side(p3, p1, ptest, p2).unwrap_or(false)
}
