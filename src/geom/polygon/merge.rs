//! Union of coplanar polygons that share boundary edges.
//!
//! Built for floor plates that tile a storey: two polygons merge when they
//! lie in the same plane and share one or more boundary edges (possibly
//! partial). The shared edges cancel and the remaining edges are chained
//! back into a single loop.

use crate::Point;
use crate::geom::polygon::Polygon;
use crate::geom::polygon::containment::is_point_on_boundary;
use crate::geom::point::check::are_points_collinear;
use anyhow::{Result, anyhow};

/// Attempts to merge two polygons into one.
///
/// Returns:
/// - `Ok(Some(union))` when the polygons are coplanar and share boundary
///   edges, so their union is a single simple polygon,
/// - `Ok(None)` when the polygons cannot merge but are not in conflict
///   (different planes, disjoint, or touching at a single point only),
/// - `Err` when the polygons are in conflict: overlapping interiors, or a
///   union that is not a single loop (e.g. it would enclose a hole).
pub fn try_merge(a: &Polygon, b: &Polygon) -> Result<Option<Polygon>> {
    let vn_a = a.normal();
    let vn_b = b.normal();
    let same_dir = vn_a.is_close(&vn_b);
    let opposite = vn_a.is_close(&(-vn_b));
    if !same_dir && !opposite {
        return Ok(None);
    }

    // Align windings so shared edges run in opposite directions
    let b_aligned;
    let b = if opposite {
        b_aligned = b.flip();
        &b_aligned
    } else {
        b
    };

    // All of b must lie on a's plane
    let (ca, cb, cc, cd) = a.plane_coefficients();
    for p in b.vertices() {
        let dist = ca * p.x + cb * p.y + cc * p.z + cd;
        if dist.abs() > crate::geom::EPS {
            return Ok(None);
        }
    }

    // Split each boundary at the other polygon's vertices so that shared
    // (possibly partial) edges coincide exactly
    let mut edges_a = split_edges(a.vertices(), b.vertices());
    let mut edges_b = split_edges(b.vertices(), a.vertices());

    // Identical same-direction edges mean the interiors overlap
    for ea in &edges_a {
        for eb in &edges_b {
            if ea.0.is_close(&eb.0) && ea.1.is_close(&eb.1) {
                return Err(anyhow!("Polygons overlap along a boundary edge"));
            }
        }
    }

    // Cancel shared edges (opposite directions)
    let mut cancelled = false;
    let mut i = 0;
    while i < edges_a.len() {
        let mut matched = None;
        for (j, eb) in edges_b.iter().enumerate() {
            if edges_a[i].0.is_close(&eb.1) && edges_a[i].1.is_close(&eb.0) {
                matched = Some(j);
                break;
            }
        }
        if let Some(j) = matched {
            edges_a.remove(i);
            edges_b.remove(j);
            cancelled = true;
        } else {
            i += 1;
        }
    }

    if !cancelled {
        // No shared boundary. Either disjoint (fine) or one inside the other
        if polygons_interiors_overlap(a, b) {
            return Err(anyhow!("Polygons overlap without a shared boundary edge"));
        }
        return Ok(None);
    }

    let mut remaining: Vec<(Point, Point)> = edges_a;
    remaining.extend(edges_b);
    if remaining.len() < 3 {
        return Err(anyhow!("Shared edges leave no boundary to merge"));
    }

    let loop_pts = chain_into_loop(remaining)?;
    let loop_pts = drop_collinear_vertices(loop_pts);

    Ok(Some(Polygon::new(loop_pts)?))
}

/// Splits the edges of `loop_pts` at every point of `splitters` lying
/// strictly inside an edge.
fn split_edges(loop_pts: &[Point], splitters: &[Point]) -> Vec<(Point, Point)> {
    let n = loop_pts.len();
    let mut edges = Vec::with_capacity(n);
    for i in 0..n {
        let start = loop_pts[i];
        let end = loop_pts[(i + 1) % n];
        let mut cuts: Vec<Point> = splitters
            .iter()
            .filter(|p| p.is_on_segment(start, end) && !p.is_close(&start) && !p.is_close(&end))
            .cloned()
            .collect();
        cuts.sort_by(|p, q| {
            let dp = p.distance_to(&start);
            let dq = q.distance_to(&start);
            dp.partial_cmp(&dq).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut prev = start;
        for cut in cuts {
            edges.push((prev, cut));
            prev = cut;
        }
        edges.push((prev, end));
    }
    edges
}

/// Checks whether one polygon reaches into the interior of the other.
fn polygons_interiors_overlap(a: &Polygon, b: &Polygon) -> bool {
    let inside_a = |p: Point| a.is_point_inside(p, false) && !is_point_on_boundary(p, a.vertices());
    let inside_b = |p: Point| b.is_point_inside(p, false) && !is_point_on_boundary(p, b.vertices());

    b.vertices().iter().any(|p| inside_a(*p))
        || a.vertices().iter().any(|p| inside_b(*p))
        || inside_a(b.centroid())
        || inside_b(a.centroid())
}

/// Chains directed edges into a single closed loop of vertices.
fn chain_into_loop(mut edges: Vec<(Point, Point)>) -> Result<Vec<Point>> {
    let (start, mut cursor) = edges.swap_remove(0);
    let mut loop_pts = vec![start];

    while !cursor.is_close(&start) {
        loop_pts.push(cursor);
        let mut next = None;
        for (i, e) in edges.iter().enumerate() {
            if e.0.is_close(&cursor) {
                if next.is_some() {
                    return Err(anyhow!("Merged boundary branches at {}", cursor));
                }
                next = Some(i);
            }
        }
        let Some(i) = next else {
            return Err(anyhow!("Merged boundary does not close at {}", cursor));
        };
        cursor = edges.swap_remove(i).1;
    }
    if !edges.is_empty() {
        // Leftover edges form a second loop, e.g. around a hole
        return Err(anyhow!("Merged boundary is not a single loop"));
    }

    Ok(loop_pts)
}

/// Removes vertices lying on a straight run between their neighbors.
fn drop_collinear_vertices(pts: Vec<Point>) -> Vec<Point> {
    let n = pts.len();
    if n <= 3 {
        return pts;
    }
    let mut kept = Vec::with_capacity(n);
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let next = pts[(i + 1) % n];
        if !are_points_collinear(&[prev, pts[i], next]) {
            kept.push(pts[i]);
        }
    }
    kept
}
