pub mod block;
pub mod config;
mod core;
pub mod finalize;
pub mod index_utils;
mod voxel_data;
pub mod word;

pub use crate::{
    block::{Block, Liquid},
    config::{FinalizeConfig, FinalizeSettings},
    core::{Chunk, ChunkColumn},
    finalize::{FinalizeStats, Finalizer},
    voxel_data::{VoxelData, VoxelDataSummary, VoxelIndex, VoxelIndexMut},
    word::{StairCorner, Voxel},
};
