use cgmath::{BaseFloat, BaseNum, InnerSpace, Point3, Vector2, Vector3, Zero};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray<T> {
    pub origin: Point3<T>,
    pub dir: Vector3<T>,
}

/// A point where a ray intersected with a surface, identified by its t-value along the ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Intersection<T> {
    pub t: T,
}

/// Running state of a "test every face, keep the nearest" query. One `RayHit` is shared by all
/// the primitives tested for a single voxel or entity: each primitive only accepts an
/// intersection strictly nearer than the current `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit<T> {
    /// Parameter of the nearest accepted intersection so far, or infinity.
    pub t: T,
    /// Total distance the ray has travelled across all advanced hits.
    pub distance: T,
    /// Surface normal of the nearest hit. Primitives leave this to the caller.
    pub normal: Vector3<T>,
    /// Texture coordinate of the nearest hit.
    pub uv: Vector2<T>,
}

impl<T> Ray<T>
where
    T: BaseNum,
{
    pub fn new(origin: Point3<T>, dir: Vector3<T>) -> Self {
        Ray { origin, dir }
    }

    /// Evaluate the ray at a t-value to get a concrete position.
    pub fn get(&self, t: T) -> Point3<T> {
        self.origin + self.dir * t
    }

    /// Move the ray's origin by some offset.
    pub fn offset(&self, offset: Vector3<T>) -> Self {
        Self {
            origin: self.origin + offset,
            dir: self.dir,
        }
    }
}

impl<T> Ray<T>
where
    T: BaseFloat,
{
    /// Tests if a plane intersects the ray. If this function returns `None` it means the ray is
    /// parallel to the plane and therefore does not intersect it.
    pub fn test_plane(&self, origin: Point3<T>, normal: Vector3<T>) -> Option<Intersection<T>> {
        // ray: x = a + t*d
        // plane: n . (x - p) = 0

        // intersection calculation:
        // sub x into plane equation: n . (a + t * d - p) = 0
        // expand dot product:        n . (a - p) + n . (t * d) = 0
        // rearrange:                 t * n . d = n . (p - a)
        // solve for t:               t = (n . (p - a)) / (n . d)
        // N.B. if the divisor is zero it means there is no intersection

        let divisor = normal.dot(self.dir);
        if divisor.abs_diff_eq(&T::zero(), T::default_epsilon()) {
            return None;
        }

        let t = normal.dot(origin - self.origin) / divisor;
        Some(Intersection { t })
    }
}

impl<T> RayHit<T>
where
    T: BaseFloat,
{
    /// A hit record with no intersection yet.
    pub fn new() -> Self {
        RayHit {
            t: T::infinity(),
            distance: T::zero(),
            normal: Vector3::zero(),
            uv: Vector2::zero(),
        }
    }

    /// Forget the nearest hit before testing a new set of primitives. The travelled distance is
    /// kept.
    #[inline]
    pub fn reset(&mut self) {
        self.t = T::infinity();
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.t.is_finite()
    }

    /// Moves the ray to the nearest hit and accumulates the travelled distance.
    pub fn advance(&self, ray: &mut Ray<T>) -> T {
        debug_assert!(self.is_hit());
        ray.origin = ray.get(self.t);
        self.distance + self.t
    }

    /// Commits the nearest hit: the ray origin moves to the hit point and `distance` grows by
    /// `t`.
    pub fn commit(&mut self, ray: &mut Ray<T>) {
        self.distance = self.advance(ray);
    }
}

impl<T> Default for RayHit<T>
where
    T: BaseFloat,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_parallel() {
        let ray = Ray::new(Point3::new(0.0, 0.0, -1.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.test_plane(Point3::new(0.0, 0.0, 0.0), Vector3::unit_z()), None);

        let ray = Ray::new(Point3::new(0.0, 0.0, -1.0), Vector3::new(0.0, 0.0, 2.0));
        let int = ray
            .test_plane(Point3::new(3.0, 3.0, 0.0), Vector3::unit_z())
            .unwrap();
        assert_eq!(int.t, 0.5);
    }

    #[test]
    fn test_commit_hit() {
        let mut ray = Ray::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, -1.0, 0.0));
        let mut hit = RayHit::new();
        assert!(!hit.is_hit());

        hit.t = 1.5;
        hit.commit(&mut ray);
        assert_eq!(ray.origin, Point3::new(1.0, 0.5, 3.0));
        assert_eq!(hit.distance, 1.5);

        hit.reset();
        assert!(!hit.is_hit());
        assert_eq!(hit.distance, 1.5);
    }
}
