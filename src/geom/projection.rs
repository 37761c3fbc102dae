//! In-plane coordinates for planar polygons.

use crate::Point;
use crate::Vector;

/// Orthonormal frame spanning a plane, used to go back and forth
/// between 3D points on the plane and flat (u, v) coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PlaneBasis {
    origin: Point,
    u: Vector,
    v: Vector,
}

impl PlaneBasis {
    /// Builds the frame for the plane through `origin` with the given
    /// normal. Returns `None` for a zero-length normal.
    pub fn from_normal(origin: Point, normal: Vector) -> Option<Self> {
        let n = normal.normalize().ok()?;
        // Any axis not parallel to the normal works as the seed
        let seed = if n.dz.abs() < 0.9 {
            Vector::new(0.0, 0.0, 1.0)
        } else {
            Vector::new(0.0, 1.0, 0.0)
        };
        let u = seed.cross(&n).normalize().ok()?;
        let v = n.cross(&u).normalize().ok()?;
        Some(Self { origin, u, v })
    }

    /// Flattens `p` into (u, v) coordinates on the plane.
    pub fn project(&self, p: Point) -> (f64, f64) {
        let r = p - self.origin;
        (r.dot(&self.u), r.dot(&self.v))
    }

    /// Lifts flat (u, v) coordinates back onto the plane.
    pub fn unproject(&self, x: f64, y: f64) -> Point {
        self.origin + self.u * x + self.v * y
    }
}
