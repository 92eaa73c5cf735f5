use cgmath::{EuclideanSpace, Point3, Vector3};
use lazy_static::lazy_static;

use voxray_util::{convert_point, Quad, Ray, RayHit, UvRect};
use voxray_voxels::Voxel;

use crate::shape::AngledShapes;

/// Which material a sign face is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignFace {
    /// The front of the board, carrying the sign text.
    Text,
    /// Any other face, drawn with the plain wood texture.
    Board,
}

/// The front face comes first in every shape of [`SIGN_POST`].
const TEXT_FACE: usize = 0;

fn quad(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3], uv: UvRect<f64>) -> Quad<f64> {
    let p = |v: [f64; 3]| Point3::new(v[0], v[1], v[2]);
    Quad::new(p(v0), p(v1), p(v2), uv)
}

fn uv(u0: f64, u1: f64, v0: f64, v1: f64) -> UvRect<f64> {
    UvRect::new(u0 / 64.0, u1 / 64.0, v0 / 32.0, v1 / 32.0)
}

/// The sign facing south. Coordinates are in blocks, texture coordinates in texels of the 64x32
/// sign texture.
fn south() -> Vec<Quad<f64>> {
    const B0: f64 = 9.0 / 16.0;
    const B1: f64 = 17.0 / 16.0;
    const Z0: f64 = 7.0 / 16.0;
    const Z1: f64 = 9.0 / 16.0;
    const P0: f64 = 7.0 / 16.0;
    const P1: f64 = 9.0 / 16.0;

    vec![
        // board front
        quad([0., B0, Z1], [1., B0, Z1], [0., B1, Z1], UvRect::unit()),
        // board back
        quad([1., B0, Z0], [0., B0, Z0], [1., B1, Z0], uv(28., 52., 18., 30.)),
        // board left and right
        quad([0., B0, Z0], [0., B0, Z1], [0., B1, Z0], uv(0., 2., 18., 30.)),
        quad([1., B0, Z1], [1., B0, Z0], [1., B1, Z1], uv(26., 28., 18., 30.)),
        // board top and bottom
        quad([1., B1, Z0], [0., B1, Z0], [1., B1, Z1], uv(2., 26., 32., 30.)),
        quad([0., B0, Z0], [1., B0, Z0], [0., B0, Z1], uv(26., 50., 32., 30.)),
        // post front, back, left, right
        quad([P0, 0., Z1], [P1, 0., Z1], [P0, B0, Z1], uv(2., 4., 2., 16.)),
        quad([P1, 0., Z0], [P0, 0., Z0], [P1, B0, Z0], uv(4., 6., 2., 16.)),
        quad([P0, 0., Z0], [P0, 0., Z1], [P0, B0, Z0], uv(0., 2., 2., 16.)),
        quad([P1, 0., Z1], [P1, 0., Z0], [P1, B0, Z1], uv(6., 8., 2., 16.)),
        // post bottom
        quad([P0, 0., Z0], [P1, 0., Z0], [P0, 0., Z1], uv(4., 6., 16., 18.)),
    ]
}

lazy_static! {
    pub static ref SIGN_POST: AngledShapes = AngledShapes::from_south(&south());
}

/// A sign post placed in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignPost {
    /// World position of the block corner the sign stands on.
    pub position: Point3<f64>,
    /// Sixteenths of a turn clockwise from south, seen from above.
    pub angle: u32,
}

impl SignPost {
    pub fn new(position: Point3<f64>, angle: u32) -> Self {
        SignPost {
            position,
            angle: angle & 0xF,
        }
    }

    /// Sign post standing in the block at `p`, turned by the block data.
    pub fn from_voxel(p: Point3<i64>, voxel: Voxel) -> Self {
        SignPost::new(convert_point!(p, f64), voxel.block_data())
    }

    /// Faces of the sign moved to its world position plus `offset`.
    pub fn quads(&self, offset: Vector3<f64>) -> Vec<(SignFace, Quad<f64>)> {
        let translation = self.position.to_vec() + offset;
        SIGN_POST
            .get(self.angle)
            .iter()
            .enumerate()
            .map(|(index, quad)| (face_kind(index), quad.translate(translation)))
            .collect()
    }

    /// Intersects the sign in world coordinates, keeping the nearest face in `hit`. Returns the
    /// kind of face that was hit. Unlike block models the ray is left where it is.
    pub fn intersect(&self, ray: &Ray<f64>, hit: &mut RayHit<f64>) -> Option<SignFace> {
        let local = ray.offset(-self.position.to_vec());
        crate::intersect_nearest(SIGN_POST.get(self.angle), &local, hit).map(face_kind)
    }
}

fn face_kind(index: usize) -> SignFace {
    if index == TEXT_FACE {
        SignFace::Text
    } else {
        SignFace::Board
    }
}
