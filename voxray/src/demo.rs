use anyhow::{bail, Result};
use cgmath::Point3;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

use voxray_voxels::{
    index_utils::CHUNK_SIDE, word::layout, Block, ChunkColumn, Voxel, VoxelData, VoxelIndexMut,
};

use crate::files::WorldMeta;
use crate::settings::DemoWorldConfig;

/// Layers of dirt under the grass.
const DIRT_DEPTH: i64 = 3;

struct DemoBuilder {
    voxels: VoxelData,
    rng: StdRng,
    ground: i64,
}

pub fn generate_demo(config: &DemoWorldConfig) -> Result<(WorldMeta, VoxelData)> {
    if config.columns < 1 {
        bail!("demo world needs at least one column, got {}", config.columns);
    }
    if config.ground_level <= DIRT_DEPTH + 2 {
        bail!(
            "demo ground level must be above {}, got {}",
            DIRT_DEPTH + 2,
            config.ground_level
        );
    }

    let mut builder = DemoBuilder {
        voxels: VoxelData::new(),
        rng: StdRng::seed_from_u64(config.seed),
        ground: config.ground_level,
    };

    let columns: Vec<ChunkColumn> = (0..config.columns)
        .flat_map(|z| (0..config.columns).map(move |x| ChunkColumn::new(x, z)))
        .collect();
    for &column in &columns {
        builder.terrain(column);
    }
    builder.features();

    info!(
        "Generated demo world with {} columns, ground at y={}",
        columns.len(),
        config.ground_level
    );

    let meta = WorldMeta {
        origin: Point3::new(0, 0, 0),
        columns,
        finalized: false,
    };
    Ok((meta, builder.voxels))
}

impl DemoBuilder {
    fn put(&mut self, (x, y, z): (i64, i64, i64), block: Block, data: u32) {
        self.voxels.set(Voxel::encode(block.id(), data), Point3::new(x, y, z));
    }

    /// Puts a block on top of the ground.
    fn place(&mut self, (x, dy, z): (i64, i64, i64), block: Block, data: u32) {
        let y = self.ground + dy;
        self.put((x, y, z), block, data);
    }

    /// Fills a column with bedrock, stone with the occasional ore, dirt and grass. The first
    /// column stays flat so that the features sit on level ground.
    fn terrain(&mut self, column: ChunkColumn) {
        self.voxels.load_column(column, 0..self.ground + CHUNK_SIDE);

        let flat = column == ChunkColumn::new(0, 0);
        for cz in 0..CHUNK_SIDE {
            for cx in 0..CHUNK_SIDE {
                let x = cx + column.x * CHUNK_SIDE;
                let z = cz + column.z * CHUNK_SIDE;
                let top = if flat {
                    self.ground
                } else {
                    self.ground + self.rng.gen_range(-1, 2)
                };

                self.put((x, 0, z), Block::BEDROCK, 0);
                for y in 1..top - DIRT_DEPTH - 1 {
                    let block = if self.rng.gen_bool(0.05) {
                        Block::COAL_ORE
                    } else {
                        Block::STONE
                    };
                    self.put((x, y, z), block, 0);
                }
                for y in top - DIRT_DEPTH - 1..top - 1 {
                    self.put((x, y, z), Block::DIRT, 0);
                }
                self.put((x, top - 1, z), Block::GRASS, 0);
            }
        }
    }

    /// Places one group of blocks for each finalizer rule in the first column.
    fn features(&mut self) {
        // a pond sunk into the grass, shallower towards the edges
        for x in 2..5 {
            for z in 2..5 {
                let data = if (x, z) == (3, 3) {
                    0
                } else {
                    self.rng.gen_range(1, 4)
                };
                self.place((x, -1, z), Block::STATIONARY_WATER, data);
            }
        }
        let spring = Voxel::encode(Block::WATER.id(), 0).with_flag(layout::FULL_BLOCK);
        self.voxels.set(spring, Point3::new(5, self.ground - 1, 3));
        self.place((7, -1, 2), Block::LAVA, 2);
        self.place((7, -1, 3), Block::STATIONARY_LAVA, 5);

        // tripwire strung between two hooks
        self.place((2, 0, 8), Block::TRIPWIRE_HOOK, 3);
        self.place((3, 0, 8), Block::TRIPWIRE, 0);
        self.place((4, 0, 8), Block::TRIPWIRE, 0);
        self.place((5, 0, 8), Block::TRIPWIRE_HOOK, 1);

        // redstone climbing a block, with a lever at the start
        self.place((2, 0, 11), Block::REDSTONE_WIRE, 0);
        self.place((3, 0, 11), Block::REDSTONE_WIRE, 0);
        self.place((4, 0, 11), Block::STONE, 0);
        self.place((4, 1, 11), Block::REDSTONE_WIRE, 0);
        self.place((2, 0, 12), Block::LEVER, 5);

        // stems next to their fruit
        self.place((8, 0, 8), Block::PUMPKIN_STEM, 7);
        self.place((9, 0, 8), Block::PUMPKIN, 0);
        self.place((8, 0, 10), Block::MELON_STEM, 7);
        self.place((8, 0, 11), Block::MELON, 0);

        // a double chest and a single chest with an out of range orientation
        self.place((11, 0, 2), Block::CHEST, 2);
        self.place((12, 0, 2), Block::CHEST, 2);
        self.place((14, 0, 2), Block::CHEST, 7);

        // thin connectors
        self.place((11, 0, 5), Block::IRON_BARS, 0);
        self.place((12, 0, 5), Block::IRON_BARS, 0);
        self.place((13, 0, 5), Block::GLASS_PANE, 0);
        self.place((14, 0, 5), Block::GLASS, 0);
        self.place((11, 0, 8), Block::FENCE, 0);
        self.place((12, 0, 8), Block::FENCE, 0);
        self.place((13, 0, 8), Block::FENCE_GATE, 0);
        self.place((11, 0, 10), Block::NETHER_BRICK_FENCE, 0);
        self.place((11, 0, 11), Block::NETHER_BRICK_FENCE, 0);
        self.place((13, 0, 11), Block::COBBLESTONE_WALL, 0);
        self.place((13, 0, 12), Block::COBBLESTONE_WALL, 1);

        // stairs ascending east backed by stairs ascending south form a corner
        self.place((6, 0, 13), Block::OAK_STAIRS, 0);
        self.place((7, 0, 13), Block::STONE_STAIRS, 2);

        self.place((9, 0, 13), Block::END_ROD, 1);
        let angle = self.rng.gen_range(0, 16);
        self.place((10, 0, 14), Block::SIGN_POST, angle);
    }
}

#[cfg(test)]
mod tests {
    use voxray_voxels::{word::StairCorner, Finalizer, FinalizeSettings, VoxelIndex};

    use super::*;

    fn config() -> DemoWorldConfig {
        DemoWorldConfig {
            columns: 2,
            ground_level: 20,
            seed: 7,
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let (meta, voxels) = generate_demo(&config()).unwrap();
        let (_, again) = generate_demo(&config()).unwrap();
        assert_eq!(voxels, again);
        assert_eq!(meta.columns.len(), 4);
        assert!(!meta.finalized);
        voxels.validate_block_ids().unwrap();
    }

    #[test]
    fn test_invalid_config() {
        let mut bad = config();
        bad.columns = 0;
        assert!(generate_demo(&bad).is_err());

        let mut bad = config();
        bad.ground_level = 3;
        assert!(generate_demo(&bad).is_err());
    }

    #[test]
    fn test_finalize_demo() {
        let (meta, mut voxels) = generate_demo(&config()).unwrap();
        let finalizer = Finalizer::with_settings(FinalizeSettings {
            y_max: 64,
            ..Default::default()
        });
        let stats = finalizer
            .finalize_world(&mut voxels, meta.origin, &meta.columns)
            .unwrap();
        assert_eq!(stats.columns, 4);
        assert!(stats.voxels_updated > 0);
        // buried dirt and grass along the column borders collapse into stone
        assert!(stats.voxels_merged > 0);

        let at = |x: i64, dy: i64, z: i64| voxels.get(Point3::new(x, 20 + dy, z));
        assert_eq!(at(6, 0, 13).stair_corner(), Some(StairCorner::SouthEast));
        assert!(at(3, 0, 8).flag(layout::TRIPWIRE_ATTACHED));
        assert_eq!(at(8, 0, 8).data(layout::STEM_FACING, layout::STEM_FACING_BITS), 2);
        assert_ne!(at(3, -1, 3).liquid_corners(), [0, 0, 0, 0]);
        assert_eq!(at(11, 0, 8).block_data(), voxray_voxels::word::connect::EAST);
    }
}
