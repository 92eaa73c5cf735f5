use cgmath::{Matrix3, Point3, Rad};

use crate::quad::Quad;

#[inline]
fn block_center() -> Point3<f64> {
    Point3::new(0.5, 0.5, 0.5)
}

/// Transforms every quad with the given rotation matrix around the block center.
pub fn rotate(quads: &[Quad<f64>], matrix: &Matrix3<f64>) -> Vec<Quad<f64>> {
    quads
        .iter()
        .map(|quad| quad.transform(matrix, block_center()))
        .collect()
}

/// Quarter turn about the x axis: `(x, y, z) -> (x, -z, y)` relative to the block center.
pub fn rotate_x(quads: &[Quad<f64>]) -> Vec<Quad<f64>> {
    // cgmath matrices are built column by column
    #[rustfmt::skip]
    let matrix = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, 0.0, 1.0,
        0.0, -1.0, 0.0,
    );
    rotate(quads, &matrix)
}

/// Quarter turn about the y axis: `(x, y, z) -> (-z, y, x)` relative to the block center. This
/// is a clockwise turn seen from above, i.e. `rotate_y_by(-90°)`.
pub fn rotate_y(quads: &[Quad<f64>]) -> Vec<Quad<f64>> {
    #[rustfmt::skip]
    let matrix = Matrix3::new(
        0.0, 0.0, 1.0,
        0.0, 1.0, 0.0,
        -1.0, 0.0, 0.0,
    );
    rotate(quads, &matrix)
}

/// Quarter turn about the z axis: `(x, y, z) -> (-y, x, z)` relative to the block center.
pub fn rotate_z(quads: &[Quad<f64>]) -> Vec<Quad<f64>> {
    #[rustfmt::skip]
    let matrix = Matrix3::new(
        0.0, 1.0, 0.0,
        -1.0, 0.0, 0.0,
        0.0, 0.0, 1.0,
    );
    rotate(quads, &matrix)
}

/// Right-handed rotation by an arbitrary angle about the x axis.
pub fn rotate_x_by(quads: &[Quad<f64>], angle: Rad<f64>) -> Vec<Quad<f64>> {
    rotate(quads, &Matrix3::from_angle_x(angle))
}

/// Right-handed rotation by an arbitrary angle about the y axis.
pub fn rotate_y_by(quads: &[Quad<f64>], angle: Rad<f64>) -> Vec<Quad<f64>> {
    rotate(quads, &Matrix3::from_angle_y(angle))
}

/// Right-handed rotation by an arbitrary angle about the z axis.
pub fn rotate_z_by(quads: &[Quad<f64>], angle: Rad<f64>) -> Vec<Quad<f64>> {
    rotate(quads, &Matrix3::from_angle_z(angle))
}
