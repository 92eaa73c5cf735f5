use std::time::Instant;

use anyhow::{anyhow, Result};
use cgmath::{Point3, Vector3};
use lazy_static::lazy_static;
use log::{debug, info};

use crate::{
    block::{Block, Liquid},
    config::{FinalizeConfig, FinalizeSettings},
    core::ChunkColumn,
    index_utils::CHUNK_SIDE,
    voxel_data::{VoxelData, VoxelIndex, VoxelIndexMut},
    word::{connect, layout, StairCorner, Voxel},
};


/// Per-type finalization rule.
#[derive(Clone, Copy)]
pub enum Rule {
    None,
    Liquid(Liquid),
    Tripwire,
    RedstoneWire,
    Stem { fruit: Block },
    Chest,
    /// Thin block that connects to its four horizontal neighbors. The mask is written at
    /// `shift`.
    Connector { connects: fn(Block) -> bool, shift: u32 },
    Stair,
}

lazy_static! {
    static ref RULES: [Rule; 256] = {
        let mut rules = [Rule::None; 256];
        let mut register = |block: Block, rule: Rule| rules[block.id() as usize] = rule;

        register(Block::WATER, Rule::Liquid(Liquid::Water));
        register(Block::STATIONARY_WATER, Rule::Liquid(Liquid::Water));
        register(Block::LAVA, Rule::Liquid(Liquid::Lava));
        register(Block::STATIONARY_LAVA, Rule::Liquid(Liquid::Lava));
        register(Block::TRIPWIRE, Rule::Tripwire);
        register(Block::REDSTONE_WIRE, Rule::RedstoneWire);
        register(Block::PUMPKIN_STEM, Rule::Stem { fruit: Block::PUMPKIN });
        register(Block::MELON_STEM, Rule::Stem { fruit: Block::MELON });
        register(Block::CHEST, Rule::Chest);
        register(
            Block::IRON_BARS,
            Rule::Connector {
                connects: Block::is_iron_bars_connector,
                shift: layout::CONNECTOR,
            },
        );
        register(
            Block::GLASS_PANE,
            Rule::Connector {
                connects: Block::is_glass_pane_connector,
                shift: layout::CONNECTOR,
            },
        );
        register(
            Block::FENCE,
            Rule::Connector {
                connects: Block::is_fence_connector,
                shift: layout::CONNECTOR,
            },
        );
        register(
            Block::NETHER_BRICK_FENCE,
            Rule::Connector {
                connects: Block::is_nether_brick_fence_connector,
                shift: layout::CONNECTOR,
            },
        );
        register(
            Block::COBBLESTONE_WALL,
            Rule::Connector {
                connects: Block::is_stone_wall_connector,
                shift: layout::STONE_WALL_CONNECTOR,
            },
        );
        for &stair in Block::STAIRS.iter() {
            register(stair, Rule::Stair);
        }

        rules
    };
}

impl Rule {
    #[inline]
    pub fn for_block(block: Block) -> Rule {
        RULES[block.id() as usize]
    }
}

/// Counters collected while finalizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinalizeStats {
    pub columns: usize,
    pub voxels_visited: usize,
    pub voxels_updated: usize,
    pub voxels_merged: usize,
}

impl std::ops::AddAssign for FinalizeStats {
    fn add_assign(&mut self, other: Self) {
        self.columns += other.columns;
        self.voxels_visited += other.voxels_visited;
        self.voxels_updated += other.voxels_updated;
        self.voxels_merged += other.voxels_merged;
    }
}

enum Outcome {
    Unchanged,
    Merged(Voxel),
    Derived(Voxel),
}

#[derive(Debug, Clone)]
pub struct Finalizer {
    settings: FinalizeSettings,
}

/// Finalizes one chunk column in place with the default settings.
pub fn finalize_chunk<I: VoxelIndexMut>(
    index: &mut I,
    origin: Point3<i64>,
    column: ChunkColumn,
) -> FinalizeStats {
    Finalizer::with_settings(FinalizeSettings::default()).finalize_chunk(index, origin, column)
}

impl Finalizer {
    pub fn new(config: &FinalizeConfig) -> Result<Self> {
        Ok(Self::with_settings(config.validate()?))
    }

    pub fn with_settings(settings: FinalizeSettings) -> Self {
        Finalizer { settings }
    }

    pub fn settings(&self) -> &FinalizeSettings {
        &self.settings
    }

    /// Finalizes every voxel of a chunk column in place, from the bottom layer up. `origin` is
    /// the world position of index coordinate zero.
    pub fn finalize_chunk<I: VoxelIndexMut>(
        &self,
        index: &mut I,
        origin: Point3<i64>,
        column: ChunkColumn,
    ) -> FinalizeStats {
        let mut stats = FinalizeStats {
            columns: 1,
            ..Default::default()
        };

        for (p, local) in self.column_points(origin, column) {
            stats.voxels_visited += 1;
            match self.finalize_outcome(&*index, p, local) {
                Outcome::Unchanged => {}
                Outcome::Merged(voxel) => {
                    stats.voxels_merged += 1;
                    index.set(voxel, p);
                }
                Outcome::Derived(voxel) => {
                    stats.voxels_updated += 1;
                    index.set(voxel, p);
                }
            }
        }

        debug!(
            "Finalized column {}: {} updated, {} merged",
            column, stats.voxels_updated, stats.voxels_merged
        );
        stats
    }

    /// Finalizes the given columns one after another, in place.
    pub fn finalize_columns<I: VoxelIndexMut>(
        &self,
        index: &mut I,
        origin: Point3<i64>,
        columns: &[ChunkColumn],
    ) -> FinalizeStats {
        let ts_start = Instant::now();
        let mut stats = FinalizeStats::default();
        for &column in columns {
            stats += self.finalize_chunk(index, origin, column);
        }
        self.report(&stats, ts_start);
        stats
    }

    /// Finalizes the given columns on `worker_threads` threads. Workers read the store as it was
    /// before finalization and the collected updates are applied afterwards, which gives the same
    /// result as [`Finalizer::finalize_columns`]: rules only look at type and data bits of their
    /// neighbors, and a merged voxel is only ever adjacent to opaque voxels, none of which carry
    /// a rule.
    pub fn finalize_world(
        &self,
        voxels: &mut VoxelData,
        origin: Point3<i64>,
        columns: &[ChunkColumn],
    ) -> Result<FinalizeStats> {
        let ts_start = Instant::now();
        let mut stats = FinalizeStats::default();
        if columns.is_empty() {
            return Ok(stats);
        }

        let threads = self.settings.worker_threads.max(1).min(columns.len());
        let batch_size = (columns.len() + threads - 1) / threads;
        info!(
            "Finalizing {} columns on {} threads",
            columns.len(),
            threads
        );

        let snapshot: &VoxelData = voxels;
        let batches = crossbeam::scope(|scope| {
            let handles: Vec<_> = columns
                .chunks(batch_size)
                .map(|batch| {
                    scope.spawn(move |_| {
                        batch
                            .iter()
                            .map(|&column| self.column_updates(snapshot, origin, column))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        })
        .map_err(|_| anyhow!("finalizer scope panicked"))?;

        for batch in batches {
            let batch = batch.map_err(|_| anyhow!("finalizer worker panicked"))?;
            for (updates, column_stats) in batch {
                for (p, voxel) in updates {
                    voxels.set(voxel, p);
                }
                stats += column_stats;
            }
        }

        self.report(&stats, ts_start);
        Ok(stats)
    }

    /// Computes the finalized word of the voxel at index position `p`, or `None` if it does not
    /// change. `local` is the position within the column: x and z in `0..16`, y counted from the
    /// bottom of the world in `0..y_max`.
    pub fn finalize_voxel<I: VoxelIndex>(
        &self,
        index: &I,
        p: Point3<i64>,
        local: Point3<i64>,
    ) -> Option<Voxel> {
        match self.finalize_outcome(index, p, local) {
            Outcome::Unchanged => None,
            Outcome::Merged(voxel) | Outcome::Derived(voxel) => Some(voxel),
        }
    }

    fn column_points(
        &self,
        origin: Point3<i64>,
        column: ChunkColumn,
    ) -> impl Iterator<Item = (Point3<i64>, Point3<i64>)> {
        let y_range = -origin.y..self.settings.y_max - origin.y;
        y_range.flat_map(move |cy| {
            (0..CHUNK_SIDE).flat_map(move |cz| {
                let z = cz + column.z * CHUNK_SIDE - origin.z;
                (0..CHUNK_SIDE).map(move |cx| {
                    let x = cx + column.x * CHUNK_SIDE - origin.x;
                    (Point3::new(x, cy, z), Point3::new(cx, cy + origin.y, cz))
                })
            })
        })
    }

    fn column_updates<I: VoxelIndex>(
        &self,
        index: &I,
        origin: Point3<i64>,
        column: ChunkColumn,
    ) -> (Vec<(Point3<i64>, Voxel)>, FinalizeStats) {
        let mut stats = FinalizeStats {
            columns: 1,
            ..Default::default()
        };
        let mut updates = Vec::new();

        for (p, local) in self.column_points(origin, column) {
            stats.voxels_visited += 1;
            match self.finalize_outcome(index, p, local) {
                Outcome::Unchanged => {}
                Outcome::Merged(voxel) => {
                    stats.voxels_merged += 1;
                    updates.push((p, voxel));
                }
                Outcome::Derived(voxel) => {
                    stats.voxels_updated += 1;
                    updates.push((p, voxel));
                }
            }
        }

        debug!(
            "Finalized column {}: {} updated, {} merged",
            column, stats.voxels_updated, stats.voxels_merged
        );
        (updates, stats)
    }

    fn report(&self, stats: &FinalizeStats, ts_start: Instant) {
        let elapsed = ts_start.elapsed();
        metrics::timing!("voxels.finalize.world", elapsed);
        metrics::counter!("voxels.finalize.merged", stats.voxels_merged as u64);
        metrics::counter!("voxels.finalize.updated", stats.voxels_updated as u64);

        info!(
            "Finalized {} columns in {:?}: {} voxels visited, {} updated, {} merged",
            stats.columns, elapsed, stats.voxels_visited, stats.voxels_updated, stats.voxels_merged
        );
    }

    fn finalize_outcome<I: VoxelIndex>(
        &self,
        index: &I,
        p: Point3<i64>,
        local: Point3<i64>,
    ) -> Outcome {
        let voxel = index.get(p);
        let block = Block::of(voxel);

        if self.should_merge(index, p, local, block) {
            return Outcome::Merged(Voxel::encode(self.settings.filler.id(), 0));
        }

        let derived = match Rule::for_block(block) {
            Rule::None => return Outcome::Unchanged,
            Rule::Liquid(liquid) => liquid_corners(index, p, voxel, liquid),
            Rule::Tripwire => tripwire(index, p, voxel),
            Rule::RedstoneWire => redstone_wire(index, p, voxel),
            Rule::Stem { fruit } => stem(index, p, voxel, fruit),
            Rule::Chest => chest(index, p, voxel),
            Rule::Connector { connects, shift } => connector(index, p, voxel, connects, shift),
            Rule::Stair => stair(index, p, voxel),
        };

        if derived == voxel {
            Outcome::Unchanged
        } else {
            Outcome::Derived(derived)
        }
    }

    fn should_merge<I: VoxelIndex>(
        &self,
        index: &I,
        p: Point3<i64>,
        local: Point3<i64>,
        block: Block,
    ) -> bool {
        let last = CHUNK_SIDE - 1;
        let on_border = local.x == 0 || local.x == last || local.z == 0 || local.z == last;

        self.settings.occlusion_merge
            && on_border
            && local.y > 0
            && local.y < self.settings.y_max - 1
            && block != self.settings.filler
            && block.is_opaque()
            && AXIS_NEIGHBORS
                .iter()
                .all(|&offset| index.block(p + offset).is_opaque())
    }
}

const AXIS_NEIGHBORS: [Vector3<i64>; 6] = [
    Vector3 { x: -1, y: 0, z: 0 },
    Vector3 { x: 1, y: 0, z: 0 },
    Vector3 { x: 0, y: -1, z: 0 },
    Vector3 { x: 0, y: 1, z: 0 },
    Vector3 { x: 0, y: 0, z: -1 },
    Vector3 { x: 0, y: 0, z: 1 },
];

const WEST: Vector3<i64> = Vector3 { x: -1, y: 0, z: 0 };
const EAST: Vector3<i64> = Vector3 { x: 1, y: 0, z: 0 };
const NORTH: Vector3<i64> = Vector3 { x: 0, y: 0, z: -1 };
const SOUTH: Vector3<i64> = Vector3 { x: 0, y: 0, z: 1 };
const UP: Vector3<i64> = Vector3 { x: 0, y: 1, z: 0 };

/// Horizontal ring around a voxel, starting west and turning towards +z. Corner `i` of a liquid
/// surface touches ring entries `2i`, `2i + 1` and `2i + 2`.
const LIQUID_RING: [Vector3<i64>; 8] = [
    Vector3 { x: -1, y: 0, z: 0 },
    Vector3 { x: -1, y: 0, z: 1 },
    Vector3 { x: 0, y: 0, z: 1 },
    Vector3 { x: 1, y: 0, z: 1 },
    Vector3 { x: 1, y: 0, z: 0 },
    Vector3 { x: 1, y: 0, z: -1 },
    Vector3 { x: 0, y: 0, z: -1 },
    Vector3 { x: -1, y: 0, z: -1 },
];

fn liquid_corners<I: VoxelIndex>(index: &I, p: Point3<i64>, voxel: Voxel, liquid: Liquid) -> Voxel {
    if voxel.flag(layout::FULL_BLOCK) {
        return voxel;
    }

    let level0 = 8 - voxel.block_data() as i32;

    let mut ring = [0i32; 8];
    for (level, &offset) in ring.iter_mut().zip(LIQUID_RING.iter()) {
        let neighbor = index.get(p + offset);
        let block = Block::of(neighbor);
        *level = if block.liquid() == Some(liquid) {
            let full = neighbor.data(layout::FULL_BLOCK, 1) as i32;
            8 - (1 - full) * neighbor.data(layout::DATA_OFFSET, 3) as i32
        } else if !block.is_solid() {
            0
        } else {
            level0
        };
    }

    let mut result = voxel;
    for (i, &shift) in layout::LIQUID_CORNERS.iter().enumerate() {
        let sum = level0 + ring[2 * i] + ring[2 * i + 1] + ring[(2 * i + 2) % 8];
        let height = std::cmp::min(7, 8 - sum / 4);
        result = result.with_bits(height as u32, shift);
    }
    result
}

fn tripwire<I: VoxelIndex>(index: &I, p: Point3<i64>, voxel: Voxel) -> Voxel {
    let attaches = |block: Block| block == Block::TRIPWIRE || block == Block::TRIPWIRE_HOOK;
    if attaches(index.block(p + WEST)) || attaches(index.block(p + EAST)) {
        voxel.with_flag(layout::TRIPWIRE_ATTACHED)
    } else {
        voxel
    }
}

fn redstone_wire<I: VoxelIndex>(index: &I, p: Point3<i64>, voxel: Voxel) -> Voxel {
    let west = index.block(p + WEST);
    let east = index.block(p + EAST);
    let north = index.block(p + NORTH);
    let south = index.block(p + SOUTH);

    let mut result = voxel;

    // wire climbing the side of a neighboring block
    if index.block(p + UP).is_air() {
        let climbs = [
            (west, WEST, layout::RSW_WEST_CONNECTION, layout::RSW_WEST_SIDE),
            (east, EAST, layout::RSW_EAST_CONNECTION, layout::RSW_EAST_SIDE),
            (north, NORTH, layout::RSW_NORTH_CONNECTION, layout::RSW_NORTH_SIDE),
            (south, SOUTH, layout::RSW_SOUTH_CONNECTION, layout::RSW_SOUTH_SIDE),
        ];
        for &(neighbor, offset, connection, side) in climbs.iter() {
            if neighbor.is_solid() && index.block(p + offset + UP) == Block::REDSTONE_WIRE {
                result = result.with_flag(connection).with_flag(side);
            }
        }
    }

    // wire stepping down into a neighboring gap
    let dips = |neighbor: Block, offset: Vector3<i64>| {
        neighbor.is_air() && index.block(p + offset - UP) == Block::REDSTONE_WIRE
    };

    if west.is_redstone_wire_connector() || dips(west, WEST) {
        result = result.with_flag(layout::RSW_WEST_CONNECTION);
    }
    if east.is_redstone_wire_connector() || dips(east, EAST) {
        result = result.with_flag(layout::RSW_EAST_CONNECTION);
    }
    // a connector to the south also connects north
    if north.is_redstone_wire_connector()
        || south.is_redstone_wire_connector()
        || dips(north, NORTH)
    {
        result = result.with_flag(layout::RSW_NORTH_CONNECTION);
    }
    if south.is_redstone_wire_connector() || dips(south, SOUTH) {
        result = result.with_flag(layout::RSW_SOUTH_CONNECTION);
    }

    result
}

fn stem<I: VoxelIndex>(index: &I, p: Point3<i64>, voxel: Voxel, fruit: Block) -> Voxel {
    let facing = [WEST, EAST, NORTH, SOUTH]
        .iter()
        .position(|&offset| index.block(p + offset) == fruit);

    match facing {
        Some(i) => voxel.with_bits(i as u32 + 1, layout::STEM_FACING),
        None => voxel,
    }
}

fn chest<I: VoxelIndex>(index: &I, p: Point3<i64>, voxel: Voxel) -> Voxel {
    let mut orientation = voxel.block_data() & 7;
    if !(2..=5).contains(&orientation) {
        orientation = 2;
    }

    let is_chest = |offset: Vector3<i64>| index.block(p + offset) == Block::CHEST;
    let variant = if orientation < 4 {
        if is_chest(WEST) {
            1 + (orientation - 1) % 2
        } else if is_chest(EAST) {
            1 + orientation % 2
        } else {
            0
        }
    } else if is_chest(NORTH) {
        1 + orientation % 2
    } else if is_chest(SOUTH) {
        1 + (orientation - 1) % 2
    } else {
        0
    };

    voxel.with_bits(variant, layout::CHEST_VARIANT)
}

fn connector<I: VoxelIndex>(
    index: &I,
    p: Point3<i64>,
    voxel: Voxel,
    connects: fn(Block) -> bool,
    shift: u32,
) -> Voxel {
    let sides = [
        (NORTH, connect::NORTH),
        (SOUTH, connect::SOUTH),
        (EAST, connect::EAST),
        (WEST, connect::WEST),
    ];

    let mask = sides
        .iter()
        .filter(|&&(offset, _)| connects(index.block(p + offset)))
        .fold(0, |mask, &(_, bit)| mask | bit);

    voxel.with_bits(mask, shift)
}

/// Ascent codes of stair data: 0 east, 1 west, 2 south, 3 north.
fn stair_behind(ascent: u32) -> Vector3<i64> {
    match ascent {
        0 => EAST,
        1 => WEST,
        2 => SOUTH,
        _ => NORTH,
    }
}

/// Corner formed by a stair ascending `ascent` with a stair ascending `behind` right behind it.
pub fn stair_corner(ascent: u32, behind: u32) -> Option<StairCorner> {
    match (ascent, behind) {
        (0, 2) | (2, 0) => Some(StairCorner::SouthEast),
        (0, 3) | (3, 0) => Some(StairCorner::NorthEast),
        (1, 2) | (2, 1) => Some(StairCorner::SouthWest),
        (1, 3) | (3, 1) => Some(StairCorner::NorthWest),
        _ => None,
    }
}

fn stair<I: VoxelIndex>(index: &I, p: Point3<i64>, voxel: Voxel) -> Voxel {
    let ascent = voxel.block_data() & 3;
    let behind = index.get(p + stair_behind(ascent));
    if !Block::of(behind).is_stair() {
        return voxel;
    }

    match stair_corner(ascent, behind.block_data() & 3) {
        Some(corner) => voxel.with_stair_corner(corner),
        None => voxel,
    }
}
