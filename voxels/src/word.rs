//! The 32-bit voxel word stored in the sparse index.
//!
//! ```text
//!  31            16 15  12 11   8 7        0
//! +----------------+------+------+----------+
//! |    derived     | flags| data |   type   |
//! +----------------+------+------+----------+
//! ```

use serde::{Deserialize, Serialize};

/// Bit offsets and widths of the fields packed into a voxel word.
pub mod layout {
    pub const TYPE_MASK: u32 = 0xFF;
    pub const DATA_OFFSET: u32 = 8;
    pub const DATA_BITS: u32 = 4;

    /// Liquid loaded as a full block; its corner heights are not computed.
    pub const FULL_BLOCK: u32 = 12;
    /// Tripwire is attached to a neighboring wire or hook.
    pub const TRIPWIRE_ATTACHED: u32 = 12;

    pub const DERIVED_OFFSET: u32 = 16;

    /// Liquid corner heights, one nibble each.
    pub const LIQUID_CORNERS: [u32; 4] = [16, 20, 24, 28];
    pub const LIQUID_CORNER_BITS: u32 = 4;

    pub const RSW_EAST_CONNECTION: u32 = 16;
    pub const RSW_EAST_SIDE: u32 = 17;
    pub const RSW_WEST_CONNECTION: u32 = 18;
    pub const RSW_WEST_SIDE: u32 = 19;
    pub const RSW_NORTH_CONNECTION: u32 = 20;
    pub const RSW_NORTH_SIDE: u32 = 21;
    pub const RSW_SOUTH_CONNECTION: u32 = 22;
    pub const RSW_SOUTH_SIDE: u32 = 23;

    pub const STEM_FACING: u32 = 16;
    pub const STEM_FACING_BITS: u32 = 3;

    pub const CHEST_VARIANT: u32 = 16;
    pub const CHEST_VARIANT_BITS: u32 = 2;

    /// Connection mask of iron bars, glass panes and fences. These blocks carry no data, so the
    /// mask lives in the data nibble.
    pub const CONNECTOR: u32 = 8;
    pub const STONE_WALL_CONNECTOR: u32 = 16;
    pub const CONNECTOR_BITS: u32 = 4;

    pub const STAIR_CORNER: u32 = 16;
    pub const STAIR_CORNER_BITS: u32 = 2;
    pub const STAIR_CORNER_PRESENT: u32 = 18;
}

/// Connector mask bits, shared by every connecting thin block.
pub mod connect {
    pub const NORTH: u32 = 1;
    pub const SOUTH: u32 = 2;
    pub const EAST: u32 = 4;
    pub const WEST: u32 = 8;
}

/// A raw voxel word: block type, data nibble, loader flags and derived metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Voxel(u32);

/// Corner of a stair block that forms an outer corner with the stair behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StairCorner {
    NorthEast = 0,
    SouthEast = 1,
    NorthWest = 2,
    SouthWest = 3,
}

impl Voxel {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Voxel(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Packs a block type and data nibble. Inputs are not range checked.
    #[inline]
    pub const fn encode(block_id: u8, data: u32) -> Self {
        Voxel(encode(block_id, data))
    }

    #[inline]
    pub const fn air() -> Self {
        Voxel(0)
    }

    #[inline]
    pub fn block_id(self) -> u8 {
        decode_type(self.0)
    }

    /// The block data nibble.
    #[inline]
    pub fn block_data(self) -> u32 {
        decode_data(self.0, layout::DATA_OFFSET, layout::DATA_BITS)
    }

    /// Extracts the `bits`-wide field at `shift`.
    #[inline]
    pub fn data(self, shift: u32, bits: u32) -> u32 {
        decode_data(self.0, shift, bits)
    }

    #[inline]
    pub fn flag(self, bit: u32) -> bool {
        self.data(bit, 1) != 0
    }

    /// ORs `bits` into the word at `shift`. Existing bits are never cleared.
    #[inline]
    #[must_use]
    pub fn with_bits(self, bits: u32, shift: u32) -> Self {
        Voxel(with_derived_bits(self.0, bits, shift))
    }

    #[inline]
    #[must_use]
    pub fn with_flag(self, bit: u32) -> Self {
        self.with_bits(1, bit)
    }

    /// The finalized liquid surface height at each corner, in the order the finalizer packs
    /// them.
    pub fn liquid_corners(self) -> [u32; 4] {
        let mut corners = [0; 4];
        for (corner, &shift) in corners.iter_mut().zip(layout::LIQUID_CORNERS.iter()) {
            *corner = self.data(shift, layout::LIQUID_CORNER_BITS);
        }
        corners
    }

    pub fn stair_corner(self) -> Option<StairCorner> {
        if !self.flag(layout::STAIR_CORNER_PRESENT) {
            return None;
        }

        Some(
            match self.data(layout::STAIR_CORNER, layout::STAIR_CORNER_BITS) {
                0 => StairCorner::NorthEast,
                1 => StairCorner::SouthEast,
                2 => StairCorner::NorthWest,
                _ => StairCorner::SouthWest,
            },
        )
    }

    #[must_use]
    pub fn with_stair_corner(self, corner: StairCorner) -> Self {
        self.with_bits(corner as u32, layout::STAIR_CORNER)
            .with_flag(layout::STAIR_CORNER_PRESENT)
    }
}

impl Default for Voxel {
    fn default() -> Self {
        Voxel::air()
    }
}

impl From<u32> for Voxel {
    fn from(raw: u32) -> Self {
        Voxel(raw)
    }
}

impl From<Voxel> for u32 {
    fn from(voxel: Voxel) -> Self {
        voxel.0
    }
}

#[inline]
pub fn decode_type(word: u32) -> u8 {
    (word & layout::TYPE_MASK) as u8
}

#[inline]
pub fn decode_data(word: u32, shift: u32, bits: u32) -> u32 {
    (word >> shift) & ((1u32 << bits) - 1)
}

#[inline]
pub const fn encode(block_id: u8, data: u32) -> u32 {
    block_id as u32 | (data << layout::DATA_OFFSET)
}

#[inline]
pub fn with_derived_bits(word: u32, bits: u32, shift: u32) -> u32 {
    word | (bits << shift)
}
