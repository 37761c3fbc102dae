//! Affine transforms applied to point sets.
//!
//! All functions return new points and leave the input untouched.
//! Rotations take radians and a unit axis vector. Conversion from degrees
//! and axis normalization happen at the call site.

use crate::Point;
use crate::Vector;
use crate::geom::rotation::rotate_points_around_vector;

/// Moves points along the vector `vec`.
pub fn translate_points(pts: &[Point], vec: &Vector) -> Vec<Point> {
    pts.iter().map(|p| *p + *vec).collect()
}

/// Scales points uniformly by `factor` about `origin`.
pub fn scale_points(pts: &[Point], factor: f64, origin: Point) -> Vec<Point> {
    pts.iter()
        .map(|p| {
            let rel = *p - origin;
            origin + rel * factor
        })
        .collect()
}

/// Rotates points by `phi` radians around the axis `u` passing through `origin`.
///
/// `u` must be a unit vector. Positive angles rotate counter-clockwise
/// when looking against `u`.
pub fn rotate_points_about(pts: &[Point], u: &Vector, phi: f64, origin: Point) -> Vec<Point> {
    let world_origin = Point::new(0., 0., 0.);
    let shifted: Vec<Point> = pts
        .iter()
        .map(|p| {
            let rel = *p - origin;
            world_origin + rel
        })
        .collect();
    let rotated = rotate_points_around_vector(&shifted, u, phi);

    rotated.iter().map(|p| origin + (*p - world_origin)).collect()
}

/// Reflects points across the plane with unit normal `n` passing through `origin`.
pub fn reflect_points(pts: &[Point], n: &Vector, origin: Point) -> Vec<Point> {
    pts.iter()
        .map(|p| {
            let rel = *p - origin;
            let dist = rel.dot(n);
            *p + *n * (-2.0 * dist)
        })
        .collect()
}
