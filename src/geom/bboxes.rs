use crate::geom::EPS;
use crate::geom::point::Point;

/// Returns the axis-aligned bounding box of `pts` as (min_point, max_point).
pub fn bounding_box(pts: &[Point]) -> (Point, Point) {
    let mut pmin = Point::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    let mut pmax = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);

    for p in pts {
        pmin.x = pmin.x.min(p.x);
        pmin.y = pmin.y.min(p.y);
        pmin.z = pmin.z.min(p.z);
        pmax.x = pmax.x.max(p.x);
        pmax.y = pmax.y.max(p.y);
        pmax.z = pmax.z.max(p.z);
    }

    (pmin, pmax)
}

/// Checks whether a point is inside the bounding box holding all points `pts`.
///
/// A small tolerance is applied so boundary points count as inside.
pub fn is_point_inside_bbox(ptest: Point, pts: &[Point]) -> bool {
    let (pmin, pmax) = bounding_box(pts);
    ptest.x >= pmin.x - EPS
        && ptest.x <= pmax.x + EPS
        && ptest.y >= pmin.y - EPS
        && ptest.y <= pmax.y + EPS
        && ptest.z >= pmin.z - EPS
        && ptest.z <= pmax.z + EPS
}
