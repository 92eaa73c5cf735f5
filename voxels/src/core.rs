use std::fmt;

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use crate::index_utils;
use crate::word::Voxel;

/// Encapsulates a single cubic chunk of voxels. Voxels inside a chunk are laid out x fastest,
/// then z, then y, so that a horizontal layer is contiguous.
#[derive(Clone)]
#[repr(transparent)]
pub struct Chunk {
    pub voxels: [Voxel; index_utils::chunk_size_total() as usize],
}

/// Horizontal position of a 16-wide column of chunks, in chunk units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkColumn {
    pub x: i64,
    pub z: i64,
}

impl Chunk {
    #[inline]
    pub fn get_voxel(&self, p: Point3<i64>) -> Voxel {
        self.voxels[index_utils::pack_within_chunk(p)]
    }

    #[inline]
    pub fn set_voxel(&mut self, p: Point3<i64>, val: Voxel) {
        self.voxels[index_utils::pack_within_chunk(p)] = val;
    }

    /// Creates a chunk filled with air.
    pub fn empty() -> Chunk {
        Chunk::filled(Voxel::air())
    }

    pub fn filled(voxel: Voxel) -> Chunk {
        Chunk {
            voxels: [voxel; index_utils::chunk_size_total() as usize],
        }
    }
}

impl ChunkColumn {
    pub fn new(x: i64, z: i64) -> Self {
        ChunkColumn { x, z }
    }
}

impl fmt::Display for ChunkColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chunk {{")?;
        for y in 0..index_utils::CHUNK_SIDE {
            writeln!(f, "y={}", y)?;
            for z in 0..index_utils::CHUNK_SIDE {
                for x in 0..index_utils::CHUNK_SIDE {
                    write!(f, "{:4}", self.get_voxel(Point3::new(x, y, z)).block_id())?;
                }
                writeln!(f)?;
            }
        }
        write!(f, "}}")
    }
}

impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        self.voxels[..] == other.voxels[..]
    }
}

impl Eq for Chunk {}
