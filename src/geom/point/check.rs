use super::*;
use anyhow::{Result, anyhow};

/// Checks if (multiple) points are collinear.
pub fn are_points_collinear(pts: &[Point]) -> bool {
    if pts.len() <= 2 {
        return true; // 1 or 2 points are always collinear
    }
    // Direction from the first point to the first distinct point
    let mut dir: Option<Vector> = None;
    for p in pts.iter().skip(1) {
        let v = *p - pts[0];
        if v.length() > EPS {
            dir = Some(v);
            break;
        }
    }
    let Some(dir) = dir else {
        return true; // All points coincide
    };
    pts.iter()
        .skip(1)
        .all(|p| dir.cross(&(*p - pts[0])).length() < EPS)
}

/// Checks if (multiple) points lie on a single plane.
pub fn are_points_coplanar(pts: &[Point]) -> bool {
    if pts.len() <= 3 {
        return true;
    }
    // Normal from the first non-collinear triple
    let mut vn: Option<Vector> = None;
    for i in 1..pts.len() - 1 {
        if let Ok(n) = Vector::normal(pts[0], pts[i], pts[i + 1]) {
            vn = Some(n);
            break;
        }
    }
    let Some(vn) = vn else {
        return true; // All points collinear
    };
    pts.iter().all(|p| vn.dot(&(*p - pts[0])).abs() < EPS)
}

/// Checks if `ptest` and `pref` are on the same side of the line `p1 -> p2`.
///
/// Fails if the reference point lies on the line itself.
pub fn is_point_on_same_side(p1: Point, p2: Point, ptest: Point, pref: Point) -> Result<bool> {
    let edge = p2 - p1;
    let cross_test = edge.cross(&(ptest - p1));
    let cross_ref = edge.cross(&(pref - p1));
    if cross_ref.length() < EPS {
        return Err(anyhow!("Reference point lies on the edge"));
    }
    if cross_test.length() < EPS {
        // ptest is on the line, treat as same side
        return Ok(true);
    }
    Ok(cross_test.dot(&cross_ref) > 0.)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collinear() {
        let pts = vec![
            Point::new(0., 0., 0.),
            Point::new(1., 1., 1.),
            Point::new(2., 2., 2.),
        ];
        assert!(are_points_collinear(&pts));

        let pts = vec![
            Point::new(0., 0., 0.),
            Point::new(1., 1., 1.),
            Point::new(2., 2., 2.5),
        ];
        assert!(!are_points_collinear(&pts));

        // Point on the opposite side of the start point still counts
        let pts = vec![
            Point::new(0., 0., 0.),
            Point::new(1., 0., 0.),
            Point::new(-1., 0., 0.),
        ];
        assert!(are_points_collinear(&pts));
    }

    #[test]
    fn test_coplanar() {
        let pts = vec![
            Point::new(0., 0., 0.),
            Point::new(1., 0., 0.),
            Point::new(1., 1., 0.),
            Point::new(0., 1., 0.),
        ];
        assert!(are_points_coplanar(&pts));

        let pts = vec![
            Point::new(0., 0., 0.),
            Point::new(1., 0., 0.),
            Point::new(1., 1., 0.),
            Point::new(0., 1., 0.5),
        ];
        assert!(!are_points_coplanar(&pts));
    }

    #[test]
    fn test_same_side() -> Result<()> {
        let p1 = Point::new(0., 0., 0.);
        let p2 = Point::new(1., 0., 0.);
        let pref = Point::new(0.5, 1., 0.);
        assert!(is_point_on_same_side(p1, p2, Point::new(0.1, 0.5, 0.), pref)?);
        assert!(!is_point_on_same_side(
            p1,
            p2,
            Point::new(0.1, -0.5, 0.),
            pref
        )?);
        Ok(())
    }
}
