use cgmath::Point3;
use lazy_static::lazy_static;

use voxray_util::{Bounds, Quad, Ray, RayHit};
use voxray_voxels::{
    word::{connect, layout},
    Voxel,
};

const POST_MIN: f64 = 6.0 / 16.0;
const POST_MAX: f64 = 10.0 / 16.0;
const RAIL_MIN: f64 = 7.0 / 16.0;
const RAIL_MAX: f64 = 9.0 / 16.0;
/// Bottom and top of the lower and upper rail.
const RAILS: [(f64, f64); 2] = [(6.0 / 16.0, 9.0 / 16.0), (12.0 / 16.0, 15.0 / 16.0)];

/// Connection bits in the order of [`FenceShape::arms`].
const ARM_BITS: [u32; 4] = [connect::NORTH, connect::SOUTH, connect::EAST, connect::WEST];

fn cuboid(min: [f64; 3], max: [f64; 3]) -> Vec<Quad<f64>> {
    Bounds::from_limit(
        Point3::new(min[0], min[1], min[2]),
        Point3::new(max[0], max[1], max[2]),
    )
    .face_quads()
    .to_vec()
}

pub struct FenceShape {
    post: Vec<Quad<f64>>,
    /// Rails towards north, south, east and west.
    arms: [Vec<Quad<f64>>; 4],
}

impl FenceShape {
    fn new() -> Self {
        let post = cuboid([POST_MIN, 0.0, POST_MIN], [POST_MAX, 1.0, POST_MAX]);

        let arm = |min_xz: [f64; 2], max_xz: [f64; 2]| -> Vec<Quad<f64>> {
            RAILS
                .iter()
                .flat_map(|&(bottom, top)| {
                    cuboid([min_xz[0], bottom, min_xz[1]], [max_xz[0], top, max_xz[1]])
                })
                .collect()
        };

        FenceShape {
            post,
            arms: [
                arm([RAIL_MIN, 0.0], [RAIL_MAX, POST_MIN]),
                arm([RAIL_MIN, POST_MAX], [RAIL_MAX, 1.0]),
                arm([POST_MAX, RAIL_MIN], [1.0, RAIL_MAX]),
                arm([0.0, RAIL_MIN], [POST_MIN, RAIL_MAX]),
            ],
        }
    }

    /// The post followed by the rails selected by a connection mask.
    pub fn parts(&self, mask: u32) -> impl Iterator<Item = &[Quad<f64>]> + '_ {
        std::iter::once(&self.post[..]).chain(
            ARM_BITS
                .iter()
                .zip(self.arms.iter())
                .filter(move |(bit, _)| mask & **bit != 0)
                .map(|(_, arm)| &arm[..]),
        )
    }
}

lazy_static! {
    pub static ref FENCE: FenceShape = FenceShape::new();
}

#[inline]
pub fn connections(voxel: Voxel) -> u32 {
    voxel.data(layout::CONNECTOR, layout::CONNECTOR_BITS)
}

/// All faces of a finalized fence voxel.
pub fn quads(voxel: Voxel) -> Vec<Quad<f64>> {
    FENCE
        .parts(connections(voxel))
        .flat_map(|part| part.iter().copied())
        .collect()
}

/// Intersects a finalized fence voxel. On a hit the ray is moved to the hit point and
/// `hit.distance` grows accordingly.
pub fn intersect(ray: &mut Ray<f64>, hit: &mut RayHit<f64>, voxel: Voxel) -> bool {
    hit.reset();
    let mut found = false;
    for part in FENCE.parts(connections(voxel)) {
        found |= crate::intersect_nearest(part, ray, hit).is_some();
    }
    if found {
        hit.commit(ray);
    }
    found
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;
    use voxray_voxels::Block;

    use super::*;

    fn fence(mask: u32) -> Voxel {
        Voxel::encode(Block::FENCE.id(), mask)
    }

    fn from_above(x: f64, z: f64) -> Ray<f64> {
        Ray::new(Point3::new(x, 3.0, z), -Vector3::unit_y())
    }

    #[test]
    fn test_arm_count() {
        assert_eq!(quads(fence(0)).len(), 6);
        assert_eq!(quads(fence(connect::NORTH | connect::WEST)).len(), 6 + 2 * 12);
        assert_eq!(quads(fence(0xF)).len(), 6 + 4 * 12);
    }

    #[test]
    fn test_post() {
        let mut ray = from_above(0.5, 0.5);
        let mut hit = RayHit::new();
        assert!(intersect(&mut ray, &mut hit, fence(0)));
        assert_eq!(hit.t, 2.0);
        assert_eq!(hit.normal, Vector3::unit_y());
        assert_eq!(ray.origin, Point3::new(0.5, 1.0, 0.5));
    }

    #[test]
    fn test_arms() {
        // over the east rail
        let mut hit = RayHit::new();
        assert!(!intersect(&mut from_above(0.9, 0.5), &mut hit, fence(connect::WEST)));

        let mut ray = from_above(0.9, 0.5);
        let mut hit = RayHit::new();
        assert!(intersect(&mut ray, &mut hit, fence(connect::EAST)));
        assert_eq!(hit.t, 3.0 - 15.0 / 16.0);
        assert_eq!(hit.normal, Vector3::unit_y());

        // between the rails, looking west along the north arm
        let mut ray = Ray::new(Point3::new(2.0, 10.0 / 16.0, 0.1), -Vector3::unit_x());
        let mut hit = RayHit::new();
        assert!(!intersect(&mut ray, &mut hit, fence(connect::NORTH)));
        let mut ray = Ray::new(Point3::new(2.0, 7.0 / 16.0, 0.1), -Vector3::unit_x());
        assert!(intersect(&mut ray, &mut hit, fence(connect::NORTH)));
        assert_eq!(hit.normal, Vector3::unit_x());
    }
}
