use crate::Vector;
use crate::geom::EPS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

pub mod check;
pub mod convert;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns true if both points are very close to each other.
    pub fn is_close(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPS
            && (self.y - other.y).abs() < EPS
            && (self.z - other.z).abs() < EPS
    }

    /// Multiplies all coordinates by a scalar and returns a copy.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    /// Distance to another point.
    pub fn distance_to(&self, other: &Self) -> f64 {
        (*other - *self).length()
    }

    /// Checks if this point lies on the segment `p1 -> p2` (endpoints included).
    pub fn is_on_segment(&self, p1: Point, p2: Point) -> bool {
        let d = p2 - p1;
        let r = *self - p1;
        // Collinearity first, then parametric bounds
        if d.cross(&r).length() > EPS {
            return false;
        }
        let len_sq = d.dot(&d);
        if len_sq < EPS {
            return self.is_close(&p1);
        }
        let t = r.dot(&d) / len_sq;
        (-EPS..=1.0 + EPS).contains(&t)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(
            f,
            "Point({:.prec$}, {:.prec$}, {:.prec$})",
            self.x,
            self.y,
            self.z,
            prec = prec
        )
    }
}

impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, other: Vector) -> Self {
        Self {
            x: self.x + other.dx,
            y: self.y + other.dy,
            z: self.z + other.dz,
        }
    }
}

// Point difference yields the connecting vector.
impl Sub for Point {
    type Output = Vector;
    fn sub(self, other: Point) -> Vector {
        Vector {
            dx: self.x - other.x,
            dy: self.y - other.y,
            dz: self.z - other.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_close() {
        let pa = Point::new(5., 5., 5.);
        let pb = Point::new(5.00000000000001, 5., 5.);
        let pc = Point::new(5.0001, 5., 5.);
        assert!(pa.is_close(&pb));
        assert!(!pa.is_close(&pc));
    }

    #[test]
    fn test_scale() {
        let p1 = Point::new(1., 2., 3.);
        let p2 = p1.scale(10.);
        assert!(p2.is_close(&Point::new(10., 20., 30.)));
    }

    #[test]
    fn test_sub_gives_vector() {
        let p1 = Point::new(1., 1., 1.);
        let p2 = Point::new(2., 3., 4.);
        let v = p2 - p1;
        assert!(v.is_close(&Vector::new(1., 2., 3.)));
    }

    #[test]
    fn test_distance_to() {
        let p1 = Point::new(0., 0., 0.);
        let p2 = Point::new(3., 4., 0.);
        assert!((p1.distance_to(&p2) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_is_on_segment() {
        let p1 = Point::new(0., 0., 0.);
        let p2 = Point::new(2., 0., 0.);
        assert!(Point::new(1., 0., 0.).is_on_segment(p1, p2));
        assert!(Point::new(0., 0., 0.).is_on_segment(p1, p2));
        assert!(Point::new(2., 0., 0.).is_on_segment(p1, p2));
        assert!(!Point::new(3., 0., 0.).is_on_segment(p1, p2));
        assert!(!Point::new(1., 0.1, 0.).is_on_segment(p1, p2));
    }

    #[test]
    fn test_serde_round_trip() {
        let p = Point::new(1.25, -2.5, 3.0);
        let json = serde_json::to_string(&p).unwrap();
        let p2: Point = serde_json::from_str(&json).unwrap();
        assert!(p.is_close(&p2));
    }
}
