pub mod bboxes;
pub mod mesh;
pub mod point;
pub mod polygon;
pub mod projection;
pub mod rotation;
pub mod segment;
pub mod solid;
pub mod transform;
pub mod triangles;
pub mod vector;

/// Geometric precision
pub const EPS: f64 = 1e-13;

/// Approximate scalar comparison at geometric precision.
pub trait IsClose {
    fn is_close(&self, other: f64) -> bool;
}

impl IsClose for f64 {
    fn is_close(&self, other: f64) -> bool {
        (self - other).abs() < EPS
    }
}
