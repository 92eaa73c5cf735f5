use cgmath::Point3;
use lazy_static::lazy_static;

use voxray_util::{Quad, Ray, RayHit, UvRect};
use voxray_voxels::Voxel;

use crate::shape::{Facing, FacingShapes};

fn quad(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3], uv: [f64; 4]) -> Quad<f64> {
    let p = |v: [f64; 3]| Point3::new(v[0] / 16.0, v[1] / 16.0, v[2] / 16.0);
    Quad::new(
        p(v0),
        p(v1),
        p(v2),
        UvRect::new(uv[0] / 16.0, uv[1] / 16.0, uv[2] / 16.0, uv[3] / 16.0),
    )
}

/// The rod pointing up, in sixteenths of a block.
fn up() -> Vec<Quad<f64>> {
    vec![
        // rod sides
        quad([7., 1., 9.], [9., 1., 9.], [7., 16., 9.], [0., 2., 1., 16.]),
        quad([9., 1., 7.], [7., 1., 7.], [9., 16., 7.], [2., 0., 1., 16.]),
        quad([7., 1., 7.], [7., 1., 9.], [7., 16., 7.], [0., 2., 1., 16.]),
        quad([9., 1., 9.], [9., 1., 7.], [9., 16., 9.], [2., 0., 1., 16.]),
        // rod tip
        quad([7., 16., 7.], [7., 16., 9.], [9., 16., 7.], [2., 4., 14., 16.]),
        // base top and bottom
        quad([6., 1., 6.], [6., 1., 10.], [10., 1., 6.], [2., 6., 10., 14.]),
        quad([10., 0., 6.], [10., 0., 10.], [6., 0., 6.], [6., 2., 10., 14.]),
        // base sides
        quad([6., 0., 10.], [10., 0., 10.], [6., 1., 10.], [2., 4., 9., 10.]),
        quad([10., 0., 6.], [6., 0., 6.], [10., 1., 6.], [4., 2., 9., 10.]),
        quad([6., 0., 6.], [6., 0., 10.], [6., 1., 6.], [2., 4., 9., 10.]),
        quad([10., 0., 10.], [10., 0., 6.], [10., 1., 10.], [4., 2., 9., 10.]),
    ]
}

lazy_static! {
    pub static ref END_ROD: FacingShapes = FacingShapes::from_up(&up());
}

/// Intersects the end rod in the block hit by `ray`, oriented by the voxel's data. On a hit the
/// ray is moved to the hit point and `hit.distance` grows accordingly.
pub fn intersect(ray: &mut Ray<f64>, hit: &mut RayHit<f64>, voxel: Voxel) -> bool {
    hit.reset();
    let quads = END_ROD.get(Facing::from_data(voxel.block_data()));
    match crate::intersect_nearest(quads, ray, hit) {
        Some(_) => {
            hit.commit(ray);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3};
    use voxray_voxels::Block;

    use super::*;

    const TIP: usize = 4;

    #[test]
    fn test_tip_points_along_facing() {
        let expected = [
            -Vector3::unit_y(),
            Vector3::unit_y(),
            -Vector3::unit_z(),
            Vector3::unit_z(),
            -Vector3::unit_x(),
            Vector3::unit_x(),
        ];
        for (&facing, &normal) in Facing::ALL.iter().zip(expected.iter()) {
            let tip = END_ROD.get(facing)[TIP].normal();
            assert!((tip - normal).magnitude() < 1e-9, "{:?}: {:?}", facing, tip);
        }
    }

    #[test]
    fn test_intersect_from_above() {
        let voxel = Voxel::encode(Block::END_ROD.id(), 1);
        let mut ray = Ray::new(Point3::new(0.5, 3.0, 0.5), -Vector3::unit_y());
        let mut hit = RayHit::new();

        assert!(intersect(&mut ray, &mut hit, voxel));
        assert_eq!(hit.t, 2.0);
        assert_eq!(hit.distance, 2.0);
        assert_eq!(hit.normal, Vector3::unit_y());
        assert_eq!(ray.origin, Point3::new(0.5, 1.0, 0.5));
    }

    #[test]
    fn test_miss_beside_rod() {
        // pointing east, the rod lies along x and leaves the corners of the block empty
        let voxel = Voxel::encode(Block::END_ROD.id(), 5);
        let mut ray = Ray::new(Point3::new(0.9, 3.0, 0.1), -Vector3::unit_y());
        let mut hit = RayHit::new();

        assert!(!intersect(&mut ray, &mut hit, voxel));
        assert!(!hit.is_hit());
        assert_eq!(hit.distance, 0.0);
        assert_eq!(ray.origin, Point3::new(0.9, 3.0, 0.1));
    }
}
