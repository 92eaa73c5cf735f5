use cgmath::{ElementWise, EuclideanSpace, Point3, Vector3};

use voxray_util::DivDown;

pub const CHUNK_SIDE: i64 = 16;

#[inline]
pub const fn chunk_size() -> Vector3<i64> {
    Vector3 {
        x: CHUNK_SIDE,
        y: CHUNK_SIDE,
        z: CHUNK_SIDE,
    }
}

#[inline]
pub const fn chunk_size_total() -> i64 {
    CHUNK_SIDE * CHUNK_SIDE * CHUNK_SIDE
}

#[inline]
pub fn point_within_size(point: Point3<i64>, size: Vector3<i64>) -> bool {
    point.x >= 0
        && point.y >= 0
        && point.z >= 0
        && point.x < size.x
        && point.y < size.y
        && point.z < size.z
}

/// Index of a point inside a chunk, x fastest then z then y.
#[inline]
pub fn pack_within_chunk(p: Point3<i64>) -> usize {
    debug_assert!(point_within_size(p, chunk_size()));
    (p.x + p.z * CHUNK_SIDE + p.y * CHUNK_SIDE * CHUNK_SIDE) as usize
}

#[inline]
pub fn unpack_within_chunk(index: usize) -> Point3<i64> {
    let index = index as i64;
    assert!(index < chunk_size_total());
    Point3 {
        x: index % CHUNK_SIDE,
        z: (index / CHUNK_SIDE) % CHUNK_SIDE,
        y: index / (CHUNK_SIDE * CHUNK_SIDE),
    }
}

/// From a point in voxel coordinates, return the chunk position and the position of the voxel
/// within that chunk. Negative coordinates belong to negative chunk positions.
#[inline]
pub fn to_chunk_pos(p: Point3<i64>) -> (Point3<i64>, Point3<i64>) {
    let chunk_pos = p.div_down(Point3::origin() + chunk_size());
    let chunk_origin = chunk_pos.mul_element_wise(Point3::origin() + chunk_size());
    (chunk_pos, Point3::origin() + (p - chunk_origin))
}

/// indices is (chunk_pos, inner_index)
#[inline]
pub fn unpack_index(indices: (Point3<i64>, usize)) -> Point3<i64> {
    let (chunk_pos, inner_index) = indices;
    let inner_offset = unpack_within_chunk(inner_index) - Point3::origin();
    chunk_pos.mul_element_wise(Point3::origin() + chunk_size()) + inner_offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_chunk_pos() {
        let check = |p, chunk, index| {
            let (chunk_pos, inner) = to_chunk_pos(p);
            assert_eq!((chunk_pos, pack_within_chunk(inner)), (chunk, index));
        };

        check(Point3::new(0, 0, 0), Point3::new(0, 0, 0), 0);
        check(Point3::new(7, 3, 0), Point3::new(0, 0, 0), 7 + 3 * 16 * 16);
        check(
            Point3::new(37, 132, 60),
            Point3::new(2, 8, 3),
            5 + 12 * 16 + 4 * 16 * 16,
        );
        check(Point3::new(-1, 0, -17), Point3::new(-1, 0, -2), 15 + 15 * 16);
    }

    #[test]
    fn test_unpack_index() {
        let check_point = |p| {
            let (chunk_pos, inner) = to_chunk_pos(p);
            assert_eq!(p, unpack_index((chunk_pos, pack_within_chunk(inner))));
        };

        check_point(Point3::new(0, 0, 0));
        check_point(Point3::new(7, 3, 0));
        check_point(Point3::new(21, 17, 4));
        check_point(Point3::new(37, 132, 60));
        check_point(Point3::new(-1, -16, -33));
    }
}
