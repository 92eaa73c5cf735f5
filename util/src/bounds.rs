use cgmath::{BaseFloat, BaseNum, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::quad::{Quad, UvRect};

/// Represents a half-open cuboid of points: the origin is inclusive and the limit is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Bounds<T> {
    origin: Point3<T>,
    size: Vector3<T>,
}

impl<T> Bounds<T> {
    pub fn origin(self) -> Point3<T> {
        self.origin
    }
}

impl<T: BaseNum> Bounds<T> {
    #[inline]
    pub fn new(origin: Point3<T>, size: Vector3<T>) -> Self {
        assert!(size.x >= T::zero());
        assert!(size.y >= T::zero());
        assert!(size.z >= T::zero());
        Bounds { origin, size }
    }

    #[inline]
    pub fn from_limit(origin: Point3<T>, limit: Point3<T>) -> Self {
        assert!(origin.x <= limit.x);
        assert!(origin.y <= limit.y);
        assert!(origin.z <= limit.z);
        Bounds::new(origin, limit - origin)
    }

    #[inline]
    pub fn limit(self) -> Point3<T> {
        self.origin + self.size
    }
}

impl<T: BaseFloat> Bounds<T> {
    /// Returns the six faces of a box inside the unit block, ordered north, south, west, east,
    /// bottom, top. Every normal points out of the box, and texture coordinates are taken from
    /// the face's position in the block so that partial boxes show the matching part of a full
    /// block texture.
    ///
    /// Panics if the box is empty.
    pub fn face_quads(&self) -> [Quad<T>; 6] {
        let Point3 {
            x: west,
            y: bottom,
            z: north,
        } = self.origin;
        let Point3 {
            x: east,
            y: top,
            z: south,
        } = self.limit();

        let one = T::one();
        let p = Point3::new;

        [
            // north, -z
            Quad::new(
                p(east, bottom, north),
                p(west, bottom, north),
                p(east, top, north),
                UvRect::new(one - east, one - west, bottom, top),
            ),
            // south, +z
            Quad::new(
                p(west, bottom, south),
                p(east, bottom, south),
                p(west, top, south),
                UvRect::new(west, east, bottom, top),
            ),
            // west, -x
            Quad::new(
                p(west, bottom, north),
                p(west, bottom, south),
                p(west, top, north),
                UvRect::new(north, south, bottom, top),
            ),
            // east, +x
            Quad::new(
                p(east, bottom, south),
                p(east, bottom, north),
                p(east, top, south),
                UvRect::new(one - south, one - north, bottom, top),
            ),
            // bottom, -y
            Quad::new(
                p(west, bottom, north),
                p(east, bottom, north),
                p(west, bottom, south),
                UvRect::new(west, east, north, south),
            ),
            // top, +y
            Quad::new(
                p(west, top, south),
                p(east, top, south),
                p(west, top, north),
                UvRect::new(west, east, one - south, one - north),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray::{Ray, RayHit};

    #[test]
    fn test_face_normals() {
        let bounds = Bounds::from_limit(Point3::new(0.25, 0.0, 0.25), Point3::new(0.75, 1.0, 0.5));
        let faces = bounds.face_quads();

        assert_eq!(faces[0].normal(), -Vector3::unit_z());
        assert_eq!(faces[1].normal(), Vector3::unit_z());
        assert_eq!(faces[2].normal(), -Vector3::unit_x());
        assert_eq!(faces[3].normal(), Vector3::unit_x());
        assert_eq!(faces[4].normal(), -Vector3::unit_y());
        assert_eq!(faces[5].normal(), Vector3::unit_y());
    }

    #[test]
    fn test_face_uv() {
        let bounds = Bounds::from_limit(Point3::new(0.25, 0.0, 0.25), Point3::new(0.75, 0.5, 0.5));
        let faces = bounds.face_quads();

        // straight down onto the top face, over the block point (0.5, _, 0.375)
        let ray = Ray::new(Point3::new(0.5, 2.0, 0.375), -Vector3::unit_y());
        let mut hit = RayHit::new();
        assert!(faces[5].intersect(&ray, &mut hit));
        assert_eq!(hit.t, 1.5);
        assert_eq!(hit.uv.x, 0.5);
        assert_eq!(hit.uv.y, 0.625);

        // nearest face wins across the whole box
        let ray = Ray::new(Point3::new(0.5, 0.25, -1.0), Vector3::unit_z());
        let mut hit = RayHit::new();
        let hits = faces.iter().filter(|f| f.intersect(&ray, &mut hit)).count();
        assert!(hits >= 1);
        assert_eq!(hit.t, 1.25);
    }
}
