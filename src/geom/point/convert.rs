use crate::Point;
use ndarray as nd;

/// Packs points into an (n, 3) coordinate matrix.
pub fn points_to_array(points: &[Point]) -> nd::Array2<f64> {
    let mut arr = nd::Array2::zeros((points.len(), 3));
    for (mut row, p) in arr.rows_mut().into_iter().zip(points) {
        row[0] = p.x;
        row[1] = p.y;
        row[2] = p.z;
    }
    arr
}

/// Reads an (n, 3) coordinate matrix back into points.
pub fn array_to_points(arr: nd::Array2<f64>) -> Vec<Point> {
    arr.rows()
        .into_iter()
        .map(|row| Point::new(row[0], row[1], row[2]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_keeps_order() {
        let pts = vec![
            Point::new(1., 2., 3.),
            Point::new(4., 5., 6.),
            Point::new(7., 8., 9.),
        ];
        let arr = points_to_array(&pts);
        assert_eq!(arr.shape(), &[3, 3]);
        assert_eq!(array_to_points(arr), pts);
    }

    #[test]
    fn test_empty_slice() {
        let arr = points_to_array(&[]);
        assert_eq!(arr.shape(), &[0, 3]);
        assert!(array_to_points(arr).is_empty());
    }
}
