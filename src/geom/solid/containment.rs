//! Point-in-solid containment testing using ray casting.
//!
//! Casts rays from the test point in several directions and counts polygon
//! crossings. An odd count means inside. The majority vote over directions
//! absorbs the unstable cases where a ray grazes an edge or a vertex.

use crate::Point;
use crate::Vector;
use crate::geom::EPS;
use crate::geom::bboxes::bounding_box;
use crate::geom::segment::segment_crosses_polygon;
use crate::geom::solid::Solid;

const PROBE_DIRECTIONS: [Vector; 4] = [
    Vector {
        dx: 1.0,
        dy: 0.0,
        dz: 0.0,
    },
    Vector {
        dx: 0.0,
        dy: 1.0,
        dz: 0.0,
    },
    Vector {
        dx: 0.0,
        dy: 0.0,
        dz: 1.0,
    },
    Vector {
        dx: 1.0,
        dy: 1.0,
        dz: 1.0,
    },
];

/// Checks if a point lies inside a solid using the ray casting algorithm.
///
/// Points exactly on the boundary may return either value due to numerical
/// precision.
pub fn is_point_inside_solid(solid: &Solid, ptest: Point) -> bool {
    let vertices = solid.vertices();
    if vertices.is_empty() {
        return false;
    }
    let (pmin, pmax) = bounding_box(&vertices);
    let beyond = |v: f64, lo: f64, hi: f64| v < lo - EPS || v > hi + EPS;
    if beyond(ptest.x, pmin.x, pmax.x)
        || beyond(ptest.y, pmin.y, pmax.y)
        || beyond(ptest.z, pmin.z, pmax.z)
    {
        return false;
    }

    // Long enough to exit the solid from anywhere inside the bbox
    let reach = Vector::from_points(pmin, pmax).length() * 2.0 + 10.0;

    let votes = PROBE_DIRECTIONS
        .iter()
        .filter(|dir| crossings_are_odd(solid, ptest, dir, reach))
        .count();
    votes * 2 > PROBE_DIRECTIONS.len()
}

/// Casts one ray and reports whether it crosses the boundary an odd
/// number of times.
fn crossings_are_odd(solid: &Solid, ptest: Point, dir: &Vector, reach: f64) -> bool {
    let unit = match dir.normalize() {
        Ok(u) => u,
        Err(_) => return false,
    };
    let ray_end = ptest + unit * reach;
    let crossings = solid
        .faces()
        .iter()
        .filter(|poly| segment_crosses_polygon(ptest, ray_end, poly).is_some())
        .count();
    crossings % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_inside_box() -> anyhow::Result<()> {
        let solid = Solid::from_box(1.0, 1.0, 1.0, None)?;
        assert!(solid.is_point_inside(Point::new(0.5, 0.5, 0.5)));
        assert!(solid.is_point_inside(Point::new(0.1, 0.9, 0.5)));
        Ok(())
    }

    #[test]
    fn test_point_outside_box() -> anyhow::Result<()> {
        let solid = Solid::from_box(1.0, 1.0, 1.0, None)?;
        assert!(!solid.is_point_inside(Point::new(1.5, 0.5, 0.5)));
        assert!(!solid.is_point_inside(Point::new(-0.1, 0.5, 0.5)));
        assert!(!solid.is_point_inside(Point::new(0.5, 0.5, 2.0)));
        Ok(())
    }

    #[test]
    fn test_point_inside_offset_box() -> anyhow::Result<()> {
        let solid = Solid::from_box(2.0, 2.0, 2.0, Some((10.0, 10.0, 10.0)))?;
        assert!(solid.is_point_inside(Point::new(11.0, 11.0, 11.0)));
        assert!(!solid.is_point_inside(Point::new(9.0, 11.0, 11.0)));
        Ok(())
    }
}
