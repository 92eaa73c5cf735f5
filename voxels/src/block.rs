use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::word::Voxel;

/// A block type id, the low byte of a voxel word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Block(pub u8);

/// Static properties of a block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub name: &'static str,
    /// Completely hides whatever is behind each face.
    pub opaque: bool,
    /// Occupies space that liquids do not flow into and redstone can climb.
    pub solid: bool,
    /// False for ids with no table entry.
    pub known: bool,
}

/// The two liquid families. Flowing and still variants of a liquid share a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Liquid {
    Water,
    Lava,
}

impl Block {
    pub const AIR: Block = Block(0);
    pub const STONE: Block = Block(1);
    pub const GRASS: Block = Block(2);
    pub const DIRT: Block = Block(3);
    pub const COBBLESTONE: Block = Block(4);
    pub const PLANKS: Block = Block(5);
    pub const BEDROCK: Block = Block(7);
    pub const WATER: Block = Block(8);
    pub const STATIONARY_WATER: Block = Block(9);
    pub const LAVA: Block = Block(10);
    pub const STATIONARY_LAVA: Block = Block(11);
    pub const SAND: Block = Block(12);
    pub const COAL_ORE: Block = Block(16);
    pub const GLASS: Block = Block(20);
    pub const DETECTOR_RAIL: Block = Block(28);
    pub const OAK_STAIRS: Block = Block(53);
    pub const CHEST: Block = Block(54);
    pub const REDSTONE_WIRE: Block = Block(55);
    pub const SIGN_POST: Block = Block(63);
    pub const STONE_STAIRS: Block = Block(67);
    pub const LEVER: Block = Block(69);
    pub const STONE_PRESSURE_PLATE: Block = Block(70);
    pub const WOODEN_PRESSURE_PLATE: Block = Block(72);
    pub const REDSTONE_TORCH_OFF: Block = Block(75);
    pub const REDSTONE_TORCH_ON: Block = Block(76);
    pub const STONE_BUTTON: Block = Block(77);
    pub const ICE: Block = Block(79);
    pub const FENCE: Block = Block(85);
    pub const PUMPKIN: Block = Block(86);
    pub const REPEATER_OFF: Block = Block(93);
    pub const REPEATER_ON: Block = Block(94);
    pub const IRON_BARS: Block = Block(101);
    pub const GLASS_PANE: Block = Block(102);
    pub const MELON: Block = Block(103);
    pub const PUMPKIN_STEM: Block = Block(104);
    pub const MELON_STEM: Block = Block(105);
    pub const FENCE_GATE: Block = Block(107);
    pub const BRICK_STAIRS: Block = Block(108);
    pub const STONE_BRICK_STAIRS: Block = Block(109);
    pub const NETHER_BRICK_FENCE: Block = Block(113);
    pub const NETHER_BRICK_STAIRS: Block = Block(114);
    pub const SANDSTONE_STAIRS: Block = Block(128);
    pub const TRIPWIRE_HOOK: Block = Block(131);
    pub const TRIPWIRE: Block = Block(132);
    pub const SPRUCE_STAIRS: Block = Block(134);
    pub const BIRCH_STAIRS: Block = Block(135);
    pub const JUNGLE_STAIRS: Block = Block(136);
    pub const COBBLESTONE_WALL: Block = Block(139);
    pub const WOODEN_BUTTON: Block = Block(143);
    pub const TRAPPED_CHEST: Block = Block(146);
    pub const LIGHT_WEIGHTED_PRESSURE_PLATE: Block = Block(147);
    pub const HEAVY_WEIGHTED_PRESSURE_PLATE: Block = Block(148);
    pub const COMPARATOR_OFF: Block = Block(149);
    pub const COMPARATOR_ON: Block = Block(150);
    pub const DAYLIGHT_DETECTOR: Block = Block(151);
    pub const REDSTONE_BLOCK: Block = Block(152);
    pub const END_ROD: Block = Block(198);
    /// Padding type returned for positions outside every loaded chunk.
    pub const UNLOADED: Block = Block(255);

    pub const STAIRS: [Block; 9] = [
        Block::OAK_STAIRS,
        Block::STONE_STAIRS,
        Block::BRICK_STAIRS,
        Block::STONE_BRICK_STAIRS,
        Block::NETHER_BRICK_STAIRS,
        Block::SANDSTONE_STAIRS,
        Block::SPRUCE_STAIRS,
        Block::BIRCH_STAIRS,
        Block::JUNGLE_STAIRS,
    ];

    #[inline]
    pub fn of(voxel: Voxel) -> Self {
        Block(voxel.block_id())
    }

    #[inline]
    pub fn id(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn info(self) -> &'static BlockInfo {
        &BLOCK_TABLE[self.0 as usize]
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Looks a block up by its table name, e.g. `"stone"` or `"nether_brick_fence"`.
    pub fn by_name(name: &str) -> Option<Self> {
        BLOCKS_BY_NAME.get(name).copied()
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self == Block::AIR
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.info().opaque
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self.info().solid
    }

    #[inline]
    pub fn is_known(self) -> bool {
        self.info().known
    }

    pub fn is_stair(self) -> bool {
        Block::STAIRS.contains(&self)
    }

    pub fn liquid(self) -> Option<Liquid> {
        match self {
            Block::WATER | Block::STATIONARY_WATER => Some(Liquid::Water),
            Block::LAVA | Block::STATIONARY_LAVA => Some(Liquid::Lava),
            _ => None,
        }
    }

    /// Redstone wire visually connects to these blocks.
    pub fn is_redstone_wire_connector(self) -> bool {
        matches!(
            self,
            Block::REDSTONE_WIRE
                | Block::REDSTONE_TORCH_OFF
                | Block::REDSTONE_TORCH_ON
                | Block::LEVER
                | Block::STONE_BUTTON
                | Block::WOODEN_BUTTON
                | Block::STONE_PRESSURE_PLATE
                | Block::WOODEN_PRESSURE_PLATE
                | Block::LIGHT_WEIGHTED_PRESSURE_PLATE
                | Block::HEAVY_WEIGHTED_PRESSURE_PLATE
                | Block::REPEATER_OFF
                | Block::REPEATER_ON
                | Block::COMPARATOR_OFF
                | Block::COMPARATOR_ON
                | Block::REDSTONE_BLOCK
                | Block::DETECTOR_RAIL
                | Block::DAYLIGHT_DETECTOR
                | Block::TRAPPED_CHEST
        )
    }

    pub fn is_iron_bars_connector(self) -> bool {
        self.is_opaque()
            || matches!(self, Block::IRON_BARS | Block::GLASS_PANE | Block::GLASS)
    }

    pub fn is_glass_pane_connector(self) -> bool {
        self.is_iron_bars_connector()
    }

    pub fn is_fence_connector(self) -> bool {
        self.is_opaque() || matches!(self, Block::FENCE | Block::FENCE_GATE)
    }

    pub fn is_nether_brick_fence_connector(self) -> bool {
        self.is_opaque() || matches!(self, Block::NETHER_BRICK_FENCE | Block::FENCE_GATE)
    }

    pub fn is_stone_wall_connector(self) -> bool {
        self.is_opaque() || matches!(self, Block::COBBLESTONE_WALL | Block::FENCE_GATE)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

impl BlockInfo {
    const UNKNOWN: BlockInfo = BlockInfo {
        name: "unknown",
        opaque: false,
        solid: false,
        known: false,
    };
}

const O: bool = true;
const S: bool = true;
const N: bool = false;

// (id, name, opaque, solid)
#[rustfmt::skip]
const BLOCK_DEFS: &[(u8, &str, bool, bool)] = &[
    (0, "air", N, N),
    (1, "stone", O, S),
    (2, "grass", O, S),
    (3, "dirt", O, S),
    (4, "cobblestone", O, S),
    (5, "planks", O, S),
    (6, "sapling", N, N),
    (7, "bedrock", O, S),
    (8, "water", N, N),
    (9, "stationary_water", N, N),
    (10, "lava", N, N),
    (11, "stationary_lava", N, N),
    (12, "sand", O, S),
    (13, "gravel", O, S),
    (14, "gold_ore", O, S),
    (15, "iron_ore", O, S),
    (16, "coal_ore", O, S),
    (17, "log", O, S),
    (18, "leaves", N, S),
    (19, "sponge", O, S),
    (20, "glass", N, S),
    (21, "lapis_ore", O, S),
    (22, "lapis_block", O, S),
    (24, "sandstone", O, S),
    (26, "bed", N, S),
    (27, "powered_rail", N, N),
    (28, "detector_rail", N, N),
    (30, "cobweb", N, N),
    (31, "tall_grass", N, N),
    (35, "wool", O, S),
    (37, "dandelion", N, N),
    (38, "rose", N, N),
    (41, "gold_block", O, S),
    (42, "iron_block", O, S),
    (43, "double_slab", O, S),
    (44, "slab", N, S),
    (45, "bricks", O, S),
    (46, "tnt", O, S),
    (47, "bookshelf", O, S),
    (48, "mossy_cobblestone", O, S),
    (49, "obsidian", O, S),
    (50, "torch", N, N),
    (53, "oak_stairs", N, S),
    (54, "chest", N, S),
    (55, "redstone_wire", N, N),
    (56, "diamond_ore", O, S),
    (57, "diamond_block", O, S),
    (58, "crafting_table", O, S),
    (59, "wheat", N, N),
    (60, "farmland", N, S),
    (61, "furnace", O, S),
    (63, "sign_post", N, N),
    (64, "wooden_door", N, S),
    (65, "ladder", N, N),
    (66, "rail", N, N),
    (67, "stone_stairs", N, S),
    (68, "wall_sign", N, N),
    (69, "lever", N, N),
    (70, "stone_pressure_plate", N, N),
    (72, "wooden_pressure_plate", N, N),
    (73, "redstone_ore", O, S),
    (75, "redstone_torch_off", N, N),
    (76, "redstone_torch_on", N, N),
    (77, "stone_button", N, N),
    (78, "snow_layer", N, N),
    (79, "ice", N, S),
    (80, "snow_block", O, S),
    (81, "cactus", N, S),
    (82, "clay", O, S),
    (85, "fence", N, S),
    (86, "pumpkin", O, S),
    (87, "netherrack", O, S),
    (88, "soul_sand", O, S),
    (89, "glowstone", O, S),
    (91, "jack_o_lantern", O, S),
    (93, "repeater_off", N, N),
    (94, "repeater_on", N, N),
    (98, "stone_bricks", O, S),
    (101, "iron_bars", N, S),
    (102, "glass_pane", N, S),
    (103, "melon", O, S),
    (104, "pumpkin_stem", N, N),
    (105, "melon_stem", N, N),
    (106, "vines", N, N),
    (107, "fence_gate", N, S),
    (108, "brick_stairs", N, S),
    (109, "stone_brick_stairs", N, S),
    (110, "mycelium", O, S),
    (112, "nether_brick", O, S),
    (113, "nether_brick_fence", N, S),
    (114, "nether_brick_stairs", N, S),
    (121, "end_stone", O, S),
    (128, "sandstone_stairs", N, S),
    (129, "emerald_ore", O, S),
    (131, "tripwire_hook", N, N),
    (132, "tripwire", N, N),
    (133, "emerald_block", O, S),
    (134, "spruce_stairs", N, S),
    (135, "birch_stairs", N, S),
    (136, "jungle_stairs", N, S),
    (139, "cobblestone_wall", N, S),
    (143, "wooden_button", N, N),
    (146, "trapped_chest", N, S),
    (147, "light_weighted_pressure_plate", N, N),
    (148, "heavy_weighted_pressure_plate", N, N),
    (149, "comparator_off", N, N),
    (150, "comparator_on", N, N),
    (151, "daylight_detector", N, S),
    (152, "redstone_block", O, S),
    (155, "quartz_block", O, S),
    (159, "stained_clay", O, S),
    (172, "hardened_clay", O, S),
    (173, "coal_block", O, S),
    (198, "end_rod", N, N),
    (255, "unloaded", N, N),
];

lazy_static! {
    static ref BLOCK_TABLE: [BlockInfo; 256] = {
        let mut table = [BlockInfo::UNKNOWN; 256];
        for &(id, name, opaque, solid) in BLOCK_DEFS {
            table[id as usize] = BlockInfo {
                name,
                opaque,
                solid: solid || opaque,
                known: true,
            };
        }
        table
    };
    static ref BLOCKS_BY_NAME: HashMap<&'static str, Block> = BLOCK_DEFS
        .iter()
        .map(|&(id, name, _, _)| (name, Block(id)))
        .collect();
}
