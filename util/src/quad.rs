use cgmath::{BaseFloat, InnerSpace, Matrix3, Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::ray::{Ray, RayHit};

/// Texture-space rectangle mapped onto a quad. `u0`/`v0` correspond to the quad's origin corner,
/// `u1` to the end of the first edge and `v1` to the end of the second edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UvRect<T> {
    pub u0: T,
    pub u1: T,
    pub v0: T,
    pub v1: T,
}

/// A flat parallelogram in 3D space, spanned by two edge vectors from an origin corner.
///
/// Quads are the building block for every shape that is not a full cube. The normal is fixed at
/// construction as `normalize(xv × yv)`, and the quad can be hit from either side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad<T> {
    origin: Point3<T>,
    xv: Vector3<T>,
    yv: Vector3<T>,
    normal: Vector3<T>,
    uv: UvRect<T>,

    // Inverse of the Gram matrix [xv.xv, xv.yv; xv.yv, yv.yv], used to find local coordinates.
    inv_xx: T,
    inv_xy: T,
    inv_yy: T,
}

impl<T> UvRect<T> {
    pub fn new(u0: T, u1: T, v0: T, v1: T) -> Self {
        UvRect { u0, u1, v0, v1 }
    }
}

impl<T: BaseFloat> UvRect<T> {
    /// The whole texture.
    pub fn unit() -> Self {
        UvRect::new(T::zero(), T::one(), T::zero(), T::one())
    }

    /// Interpolates a texture coordinate from local quad coordinates in [0, 1].
    #[inline]
    pub fn lerp(&self, s: T, u: T) -> Vector2<T> {
        Vector2::new(
            self.u0 + s * (self.u1 - self.u0),
            self.v0 + u * (self.v1 - self.v0),
        )
    }
}

impl<T: BaseFloat> Quad<T> {
    /// Creates a quad from its origin corner `v0` and the two corners at the ends of its edges,
    /// `v1` and `v2`.
    ///
    /// Panics if the edges are parallel or zero-length.
    pub fn new(v0: Point3<T>, v1: Point3<T>, v2: Point3<T>, uv: UvRect<T>) -> Self {
        match Self::try_new(v0, v1, v2, uv) {
            Some(quad) => quad,
            None => panic!(
                "degenerate quad with corners {:?}, {:?}, {:?}",
                v0, v1, v2
            ),
        }
    }

    /// Like `new`, but returns `None` for a degenerate quad.
    pub fn try_new(v0: Point3<T>, v1: Point3<T>, v2: Point3<T>, uv: UvRect<T>) -> Option<Self> {
        let xv = v1 - v0;
        let yv = v2 - v0;
        let cross = xv.cross(yv);

        // |xv × yv|^2 is the determinant of the Gram matrix
        let det = cross.magnitude2();
        let scale = xv.magnitude2() * yv.magnitude2();
        if !(det > scale * T::default_epsilon()) {
            return None;
        }

        let xx = xv.magnitude2();
        let xy = xv.dot(yv);
        let yy = yv.magnitude2();

        Some(Quad {
            origin: v0,
            xv,
            yv,
            normal: cross / det.sqrt(),
            uv,
            inv_xx: yy / det,
            inv_xy: -xy / det,
            inv_yy: xx / det,
        })
    }

    #[inline]
    pub fn origin(&self) -> Point3<T> {
        self.origin
    }

    #[inline]
    pub fn normal(&self) -> Vector3<T> {
        self.normal
    }

    #[inline]
    pub fn uv(&self) -> UvRect<T> {
        self.uv
    }

    /// The three corners the quad was built from.
    pub fn corners(&self) -> [Point3<T>; 3] {
        [self.origin, self.origin + self.xv, self.origin + self.yv]
    }

    /// Finds the local coordinates `(s, u)` of a point on the quad's plane, such that
    /// `point = origin + s * xv + u * yv`.
    #[inline]
    pub fn local_coords(&self, point: Point3<T>) -> (T, T) {
        let p = point - self.origin;
        let px = p.dot(self.xv);
        let py = p.dot(self.yv);
        (
            self.inv_xx * px + self.inv_xy * py,
            self.inv_xy * px + self.inv_yy * py,
        )
    }

    /// Tests the ray against this quad. Accepts the intersection only if it is in front of the
    /// ray origin and nearer than `hit.t`, in which case `hit.t` and `hit.uv` are updated and
    /// `true` is returned. The normal is left for the caller to copy from `normal()`.
    pub fn intersect(&self, ray: &Ray<T>, hit: &mut RayHit<T>) -> bool {
        let intersection = match ray.test_plane(self.origin, self.normal) {
            Some(intersection) => intersection,
            None => return false,
        };

        let t = intersection.t;
        if !(t > T::zero()) || !(t < hit.t) {
            return false;
        }

        let (s, u) = self.local_coords(ray.get(t));
        let unit = |x: T| x >= T::zero() && x <= T::one();
        if !unit(s) || !unit(u) {
            return false;
        }

        hit.t = t;
        hit.uv = self.uv.lerp(s, u);
        true
    }

    /// Returns the quad moved by an offset.
    pub fn translate(&self, offset: Vector3<T>) -> Self {
        let [v0, v1, v2] = self.corners();
        Quad::new(v0 + offset, v1 + offset, v2 + offset, self.uv)
    }

    /// Returns the quad with every corner transformed by `matrix` around `pivot`. The UV
    /// rectangle is unchanged.
    pub fn transform(&self, matrix: &Matrix3<T>, pivot: Point3<T>) -> Self {
        let matrix = *matrix;
        let apply = |p: Point3<T>| pivot + matrix * (p - pivot);
        let [v0, v1, v2] = self.corners();
        Quad::new(apply(v0), apply(v1), apply(v2), self.uv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> Quad<f64> {
        Quad::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            UvRect::new(0.25, 0.75, 0.5, 1.0),
        )
    }

    #[test]
    fn test_normal() {
        assert_eq!(unit_quad().normal(), Vector3::unit_z());

        let flipped = Quad::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            UvRect::unit(),
        );
        assert_eq!(flipped.normal(), -Vector3::unit_z());
    }

    #[test]
    fn test_hit_center() {
        let quad = unit_quad();
        let ray = Ray::new(Point3::new(0.5, 0.5, -1.0), Vector3::new(0.0, 0.0, 1.0));
        let mut hit = RayHit::new();

        assert!(quad.intersect(&ray, &mut hit));
        assert_eq!(hit.t, 1.0);
        assert_eq!(hit.uv, Vector2::new(0.5, 0.75));
        assert_eq!(hit.distance, 0.0);
        assert_eq!(ray.origin, Point3::new(0.5, 0.5, -1.0));
    }

    #[test]
    fn test_miss_leaves_hit() {
        let quad = unit_quad();
        let ray = Ray::new(Point3::new(2.0, 0.5, -1.0), Vector3::new(0.0, 0.0, 1.0));
        let mut hit = RayHit::new();

        assert!(!quad.intersect(&ray, &mut hit));
        assert_eq!(hit, RayHit::new());
    }

    #[test]
    fn test_behind_and_farther() {
        let quad = unit_quad();

        // quad is behind the ray origin
        let ray = Ray::new(Point3::new(0.5, 0.5, 1.0), Vector3::new(0.0, 0.0, 1.0));
        let mut hit = RayHit::new();
        assert!(!quad.intersect(&ray, &mut hit));

        // a nearer hit was already recorded
        let ray = Ray::new(Point3::new(0.5, 0.5, -1.0), Vector3::new(0.0, 0.0, 1.0));
        let mut hit = RayHit::new();
        hit.t = 0.5;
        assert!(!quad.intersect(&ray, &mut hit));
        assert_eq!(hit.t, 0.5);

        // parallel to the plane
        let ray = Ray::new(Point3::new(0.5, 0.5, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(!quad.intersect(&ray, &mut RayHit::new()));
    }

    #[test]
    fn test_nearest_of_two() {
        let near = unit_quad();
        let far = unit_quad().translate(Vector3::new(0.0, 0.0, 2.0));
        let ray = Ray::new(Point3::new(0.5, 0.5, -1.0), Vector3::new(0.0, 0.0, 1.0));

        let mut hit = RayHit::new();
        assert!(far.intersect(&ray, &mut hit));
        assert_eq!(hit.t, 3.0);
        assert!(near.intersect(&ray, &mut hit));
        assert_eq!(hit.t, 1.0);
        assert!(!far.intersect(&ray, &mut hit));
        assert_eq!(hit.t, 1.0);
    }

    #[test]
    fn test_parallelogram() {
        // sheared edges: a point inside the parallelogram but outside its bounding rectangle
        // projection would be misclassified by a plain projection onto the edges
        let quad: Quad<f64> = Quad::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            UvRect::unit(),
        );
        let (s, u) = quad.local_coords(Point3::new(1.5, 0.5, 0.0));
        assert!((s - 1.0).abs() < 1e-12);
        assert!((u - 0.5).abs() < 1e-12);

        let ray = Ray::new(Point3::new(1.5, 0.5, 1.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(quad.intersect(&ray, &mut RayHit::new()));

        let ray = Ray::new(Point3::new(0.2, 0.5, 1.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(!quad.intersect(&ray, &mut RayHit::new()));
    }

    #[test]
    fn test_degenerate() {
        let p = Point3::new;
        assert!(Quad::try_new(
            p(0.0, 0.0, 0.0),
            p(1.0, 1.0, 1.0),
            p(2.0, 2.0, 2.0),
            UvRect::unit()
        )
        .is_none());
        assert!(Quad::try_new(
            p(0.0, 0.0, 0.0),
            p(0.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            UvRect::unit()
        )
        .is_none());
    }

    #[test]
    #[should_panic]
    fn test_degenerate_panics() {
        let p = Point3::new;
        Quad::new(
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(-3.0, 0.0, 0.0),
            UvRect::unit(),
        );
    }
}
