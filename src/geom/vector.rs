use crate::Point;
use crate::geom::EPS;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Vector {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    pub fn from_points(beg: Point, end: Point) -> Self {
        end - beg
    }

    /// Cross product between 2 vectors.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.dy * other.dz - self.dz * other.dy,
            self.dz * other.dx - self.dx * other.dz,
            self.dx * other.dy - self.dy * other.dx,
        )
    }

    /// Dot product between 2 vectors.
    pub fn dot(&self, other: &Self) -> f64 {
        self.dx * other.dx + self.dy * other.dy + self.dz * other.dz
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Componentwise comparison with the crate tolerance.
    pub fn is_close(&self, other: &Self) -> bool {
        let d = *self - *other;
        d.dx.abs() < EPS && d.dy.abs() < EPS && d.dz.abs() < EPS
    }

    /// Returns the vector scaled to unit length.
    ///
    /// Fails on a zero-length vector.
    pub fn normalize(&self) -> Result<Self> {
        let len = self.length();
        if len < EPS {
            return Err(anyhow!("Cannot normalize a zero-length vector"));
        }
        Ok(Self::new(self.dx / len, self.dy / len, self.dz / len))
    }

    /// Calculates the unit normal of the surface defined by 3 points.
    ///
    /// Fails if the points are collinear.
    pub fn normal(pt0: Point, pt1: Point, pt2: Point) -> Result<Self> {
        let v01 = pt1 - pt0;
        let v02 = pt2 - pt0;
        v01.cross(&v02).normalize()
    }

    /// Angle between two vectors in radians, in `[0, pi]`.
    pub fn angle(&self, other: &Self) -> f64 {
        let denom = self.length() * other.length();
        if denom < EPS {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(
            f,
            "Vector({:.prec$}, {:.prec$}, {:.prec$})",
            self.dx,
            self.dy,
            self.dz,
            prec = prec
        )
    }
}

impl Add for Vector {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.dx + other.dx, self.dy + other.dy, self.dz + other.dz)
    }
}

impl Sub for Vector {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        self + (-other)
    }
}

impl Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, k: f64) -> Self {
        Self::new(self.dx * k, self.dy * k, self.dz * k)
    }
}

impl Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self {
        self * -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_direction() {
        let beg = Point::new(1., 2., 3.);
        let end = Point::new(4., 2., 3.);
        assert_eq!(Vector::from_points(beg, end), Vector::new(3., 0., 0.));
        assert_eq!(Vector::from_points(end, beg), -Vector::new(3., 0., 0.));
    }

    #[test]
    fn test_cross_follows_right_hand_rule() {
        let vx = Vector::new(1., 0., 0.);
        let vy = Vector::new(0., 1., 0.);
        assert_eq!(vx.cross(&vy), Vector::new(0., 0., 1.));
        assert_eq!(vy.cross(&vx), Vector::new(0., 0., -1.));
    }

    #[test]
    fn test_length_and_dot() {
        let v = Vector::new(3., 4., 0.);
        assert_eq!(v.length(), 5.);
        assert_eq!(v.dot(&Vector::new(1., 0., 0.)), 3.);
    }

    #[test]
    fn test_normalize() {
        let v = Vector::new(0., 0., -7.).normalize().unwrap();
        assert!(v.is_close(&Vector::new(0., 0., -1.)));
        assert!(Vector::new(0., 0., 0.).normalize().is_err());
    }

    #[test]
    fn test_normal_of_three_points() -> Result<()> {
        let vn = Vector::normal(
            Point::new(0., 0., 0.),
            Point::new(2., 0., 0.),
            Point::new(2., 2., 0.),
        )?;
        assert!(vn.is_close(&Vector::new(0., 0., 1.)));
        Ok(())
    }

    #[test]
    fn test_normal_collinear_fails() {
        assert!(
            Vector::normal(
                Point::new(0., 0., 0.),
                Point::new(1., 1., 1.),
                Point::new(2., 2., 2.),
            )
            .is_err()
        );
    }

    #[test]
    fn test_angle_quarters() {
        let vx = Vector::new(1., 0., 0.);
        assert!((vx.angle(&Vector::new(0., 0., 2.)) - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
        assert!(vx.angle(&(vx * 5.)).abs() < 1e-10);
        assert!((vx.angle(&-vx) - std::f64::consts::PI).abs() < 1e-10);
        // Zero vector has no direction
        assert_eq!(vx.angle(&Vector::new(0., 0., 0.)), 0.0);
    }
}
