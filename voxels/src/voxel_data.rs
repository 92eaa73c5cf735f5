use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{self, Read, Write};
use std::ops::Range;

use anyhow::{bail, Result};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use cgmath::{ElementWise, EuclideanSpace, Point3, Vector3};

use voxray_util::{Bounds, DivDown, DivUp};

use crate::{
    block::Block,
    core::{Chunk, ChunkColumn},
    index_utils,
    word::Voxel,
};

/// Read access to a sparse voxel volume.
pub trait VoxelIndex {
    /// Returns the word at `p`. Positions that were never loaded read as [`Block::UNLOADED`].
    fn get(&self, p: Point3<i64>) -> Voxel;

    #[inline]
    fn block(&self, p: Point3<i64>) -> Block {
        Block::of(self.get(p))
    }
}

/// Write access to a sparse voxel volume.
pub trait VoxelIndexMut: VoxelIndex {
    fn set(&mut self, voxel: Voxel, p: Point3<i64>);
}

/// Sparse voxel store made of 16³ chunks keyed by chunk position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VoxelData {
    chunks: HashMap<Point3<i64>, Chunk>,
}

#[derive(Debug, PartialEq)]
pub struct VoxelDataSummary {
    pub count_total: usize,
    pub count_nonempty: usize,
    pub count_chunks: usize,
    pub count_columns: usize,
    pub pct_nonempty: f64,
    pub byte_size: usize,
    pub mb_size: usize,
    pub bounds: Option<Bounds<i64>>,
}

impl VoxelData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure every chunk of the column overlapping the voxel y range is present. Chunks
    /// that already exist are left alone; new ones are filled with air.
    pub fn load_column(&mut self, column: ChunkColumn, y_range: Range<i64>) {
        let side = index_utils::CHUNK_SIDE;
        let chunk_ys = y_range.start.div_down(side)..y_range.end.div_up(side);
        for cy in chunk_ys {
            self.chunks
                .entry(Point3::new(column.x, cy, column.z))
                .or_insert_with(Chunk::empty);
        }
    }

    /// Every column with at least one loaded chunk, in sorted order.
    pub fn columns(&self) -> BTreeSet<ChunkColumn> {
        self.chunks
            .keys()
            .map(|p| ChunkColumn::new(p.x, p.z))
            .collect()
    }

    /// Visits every chunk exactly once, in an unspecified order.
    #[inline]
    pub fn iter_chunks(&self) -> impl Iterator<Item = (Point3<i64>, &Chunk)> + '_ {
        self.chunks.iter().map(|(pos, chunk)| (*pos, chunk))
    }

    /// Visits every stored voxel exactly once, in an unspecified order.
    #[inline]
    pub fn iter_voxels(&self) -> impl Iterator<Item = (Point3<i64>, Voxel)> + '_ {
        self.iter_chunks().flat_map(move |(chunk_pos, chunk)| {
            chunk
                .voxels
                .iter()
                .enumerate()
                .map(move |(inner_index, voxel)| {
                    (index_utils::unpack_index((chunk_pos, inner_index)), *voxel)
                })
        })
    }

    /// Fails on the first stored voxel whose type has no block table entry.
    pub fn validate_block_ids(&self) -> Result<()> {
        for (chunk_pos, chunk) in self.sorted_chunks() {
            for (inner_index, voxel) in chunk.voxels.iter().enumerate() {
                let block = Block::of(*voxel);
                if !block.is_known() {
                    let p = index_utils::unpack_index((chunk_pos, inner_index));
                    bail!(
                        "unknown block id {} at ({}, {}, {})",
                        block.id(),
                        p.x,
                        p.y,
                        p.z
                    );
                }
            }
        }
        Ok(())
    }

    /// Number of stored voxels of each block type.
    pub fn block_counts(&self) -> BTreeMap<Block, usize> {
        let mut counts = BTreeMap::new();
        for (_, voxel) in self.iter_voxels() {
            *counts.entry(Block::of(voxel)).or_insert(0) += 1;
        }
        counts
    }

    /// Smallest voxel bounds holding every stored chunk.
    pub fn bounds(&self) -> Option<Bounds<i64>> {
        let mut positions = self.chunks.keys();
        let first = *positions.next()?;
        let (lo, hi) = positions.fold((first, first), |(lo, hi), p| {
            (
                Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        });

        let scale = Point3::origin() + index_utils::chunk_size();
        Some(Bounds::from_limit(
            lo.mul_element_wise(scale),
            (hi + Vector3::new(1, 1, 1)).mul_element_wise(scale),
        ))
    }

    /// Serialize the voxels in the world. Returns the number of bytes written.
    pub fn serialize_voxels<W>(&self, target: &mut W) -> io::Result<i64>
    where
        W: Write,
    {
        let mut bytes_written = 0;

        target.write_u64::<BigEndian>(self.chunks.len() as u64)?;
        bytes_written += 8;

        for (chunk_pos, chunk) in self.sorted_chunks() {
            target.write_i64::<BigEndian>(chunk_pos.x)?;
            target.write_i64::<BigEndian>(chunk_pos.y)?;
            target.write_i64::<BigEndian>(chunk_pos.z)?;
            bytes_written += 24;

            for voxel in chunk.voxels.iter() {
                target.write_u32::<BigEndian>(voxel.raw())?;
            }
            bytes_written += 4 * index_utils::chunk_size_total();
        }

        Ok(bytes_written)
    }

    /// Deserialize the world voxels from the given reader, replacing the current contents.
    pub fn deserialize_voxels<R: Read>(&mut self, src: &mut R) -> io::Result<()> {
        let count = src.read_u64::<BigEndian>()?;
        let mut chunks = HashMap::new();
        let mut raw = vec![0u32; index_utils::chunk_size_total() as usize];

        for _ in 0..count {
            let x = src.read_i64::<BigEndian>()?;
            let y = src.read_i64::<BigEndian>()?;
            let z = src.read_i64::<BigEndian>()?;
            src.read_u32_into::<BigEndian>(&mut raw)?;

            let mut chunk = Chunk::empty();
            for (voxel, &word) in chunk.voxels.iter_mut().zip(raw.iter()) {
                *voxel = Voxel::from_raw(word);
            }

            let chunk_pos = Point3::new(x, y, z);
            if chunks.insert(chunk_pos, chunk).is_some() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("duplicate chunk at {:?}", chunk_pos),
                ));
            }
        }

        self.chunks = chunks;
        Ok(())
    }

    pub fn debug_summary(&self) -> VoxelDataSummary {
        let count_chunks = self.chunks.len();
        let count_total = count_chunks * index_utils::chunk_size_total() as usize;
        let count_nonempty = self
            .iter_voxels()
            .filter(|(_, voxel)| !Block::of(*voxel).is_air())
            .count();

        let pct_nonempty = if count_total == 0 {
            0.0
        } else {
            (count_nonempty as f64 / count_total as f64) * 100.0
        };
        let byte_size = std::mem::size_of::<Voxel>() * count_total;
        let mb_size = byte_size / (1024 * 1024);

        VoxelDataSummary {
            count_total,
            count_nonempty,
            count_chunks,
            count_columns: self.columns().len(),
            pct_nonempty,
            byte_size,
            mb_size,
            bounds: self.bounds(),
        }
    }

    fn sorted_chunks(&self) -> Vec<(Point3<i64>, &Chunk)> {
        let mut chunks: Vec<_> = self.iter_chunks().collect();
        chunks.sort_by_key(|(p, _)| (p.y, p.z, p.x));
        chunks
    }
}

impl VoxelIndex for VoxelData {
    #[inline]
    fn get(&self, p: Point3<i64>) -> Voxel {
        let (chunk_pos, inner_pos) = index_utils::to_chunk_pos(p);
        match self.chunks.get(&chunk_pos) {
            Some(chunk) => chunk.get_voxel(inner_pos),
            None => Voxel::encode(Block::UNLOADED.id(), 0),
        }
    }
}

impl VoxelIndexMut for VoxelData {
    /// Sets the word at `p`, creating an air-filled chunk if none holds the position.
    #[inline]
    fn set(&mut self, voxel: Voxel, p: Point3<i64>) {
        let (chunk_pos, inner_pos) = index_utils::to_chunk_pos(p);
        self.chunks
            .entry(chunk_pos)
            .or_insert_with(Chunk::empty)
            .set_voxel(inner_pos, voxel);
    }
}
