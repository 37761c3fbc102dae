//! Point rotation about an arbitrary axis.

use crate::Point;
use crate::Vector;
use crate::geom::IsClose;
use crate::geom::point::convert::{array_to_points, points_to_array};
use ndarray as nd;

/// Rotates points around the axis `u` by the angle `phi` (radians).
///
/// Positive angles rotate counter-clockwise when looking against `u`.
/// A zero-length axis or a zero angle returns the points unchanged.
///
/// # Panics
/// Panics if `u` is neither zero-length nor a unit vector.
pub fn rotate_points_around_vector(pts: &[Point], u: &Vector, phi: f64) -> Vec<Point> {
    if u.length().is_close(0.) || phi.abs().is_close(0.) {
        return pts.to_vec();
    }
    let rot = rodrigues_matrix(u, phi);
    // Row-major points times R^T equals R applied to each point
    array_to_points(points_to_array(pts).dot(&rot.t()))
}

/// Rodrigues' rotation formula, R = I + sin(phi) W + 2 sin^2(phi/2) W^2,
/// where W is the cross-product matrix of the unit axis `u`. Numerically
/// steadier than composing the basic rotations:
/// https://en.wikipedia.org/wiki/Rodrigues%27_rotation_formula
fn rodrigues_matrix(u: &Vector, phi: f64) -> nd::Array2<f64> {
    assert!(
        u.length().is_close(1.),
        "rotation axis must be a unit vector"
    );
    let w = nd::arr2(&[[0., -u.dz, u.dy], [u.dz, 0., -u.dx], [-u.dy, u.dx, 0.]]);
    nd::Array::eye(3) + phi.sin() * &w + (2. * (phi / 2.).sin().powi(2)) * w.dot(&w)
}
