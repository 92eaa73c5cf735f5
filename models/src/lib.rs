pub mod end_rod;
pub mod fence;
pub mod shape;
pub mod sign;

use voxray_util::{Quad, Ray, RayHit};

pub use shape::{AngledShapes, Facing, FacingShapes};

/// Tests every quad against the ray and keeps the nearest hit in `hit`, including the winning
/// quad's normal. Returns the index of the nearest quad if any was hit closer than `hit.t`.
pub fn intersect_nearest(
    quads: &[Quad<f64>],
    ray: &Ray<f64>,
    hit: &mut RayHit<f64>,
) -> Option<usize> {
    let mut nearest = None;
    for (index, quad) in quads.iter().enumerate() {
        if quad.intersect(ray, hit) {
            hit.normal = quad.normal();
            nearest = Some(index);
        }
    }
    nearest
}
