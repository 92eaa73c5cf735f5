use std::f64::consts::PI;

use cgmath::Rad;

use voxray_util::{rotate, Quad};

/// Direction a block faces, in block data order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

impl Facing {
    pub const ALL: [Facing; 6] = [
        Facing::Down,
        Facing::Up,
        Facing::North,
        Facing::South,
        Facing::West,
        Facing::East,
    ];

    /// Reads a facing from block data, wrapping values past east.
    #[inline]
    pub fn from_data(data: u32) -> Facing {
        Self::ALL[(data % 6) as usize]
    }
}

/// A shape in all six axis facings.
#[derive(Debug, Clone)]
pub struct FacingShapes {
    facings: [Vec<Quad<f64>>; 6],
}

impl FacingShapes {
    /// Derives every facing from a shape that points up.
    pub fn from_up(up: &[Quad<f64>]) -> Self {
        let down = rotate::rotate_x(&rotate::rotate_x(up));
        let east = rotate::rotate_z(&down);
        let south = rotate::rotate_y(&east);
        let west = rotate::rotate_y(&south);
        let north = rotate::rotate_y(&west);

        FacingShapes {
            facings: [down, up.to_vec(), north, south, west, east],
        }
    }

    #[inline]
    pub fn get(&self, facing: Facing) -> &[Quad<f64>] {
        &self.facings[facing as usize]
    }
}

/// A shape in 16 angles about the vertical axis, each a sixteenth turn clockwise from the last
/// seen from above. Angle 0 faces south.
#[derive(Debug, Clone)]
pub struct AngledShapes {
    angles: Vec<Vec<Quad<f64>>>,
}

impl AngledShapes {
    pub const COUNT: u32 = 16;

    pub fn from_south(south: &[Quad<f64>]) -> Self {
        let angles = (0..Self::COUNT)
            .map(|i| {
                if i == 0 {
                    south.to_vec()
                } else {
                    rotate::rotate_y_by(south, Rad(-f64::from(i) * PI / 8.0))
                }
            })
            .collect();
        AngledShapes { angles }
    }

    /// Shape at the given angle. Only the low 4 bits of `angle` are used.
    #[inline]
    pub fn get(&self, angle: u32) -> &[Quad<f64>] {
        &self.angles[(angle % Self::COUNT) as usize]
    }
}
