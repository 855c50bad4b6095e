//! Piece catalog.
//!
//! Each kind is defined once, at rotation 0, as four `(row, col)` offsets from its pivot cell. Other
//! rotations are derived by turning every offset a quarter clockwise, `(dy, dx) -> (dx, -dy)`, so a
//! shape can never drift from its base definition.

use rand::Rng;

pub type Offset = (i16, i16);

pub type PieceShape = [Offset; 4];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    S,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::S,
    ];

    /// Rotation-0 offsets. The pivot is always `(0, 0)`.
    pub fn base_shape(&self) -> PieceShape {
        match self {
            PieceKind::I => [(0, -1), (0, 0), (0, 1), (0, 2)],
            PieceKind::O => [(0, 0), (0, 1), (1, 0), (1, 1)],
            PieceKind::T => [(0, -1), (0, 0), (0, 1), (1, 0)],
            PieceKind::L => [(-2, 0), (-1, 0), (0, 0), (0, 1)],
            PieceKind::S => [(-1, 0), (0, 0), (0, 1), (1, 1)],
        }
    }

    /// Number of rows the rotation-0 shape reaches above its pivot.
    pub fn top_extent(&self) -> i16 {
        self.base_shape()
            .iter()
            .map(|&(dy, _)| -dy)
            .max()
            .unwrap_or(0)
            .max(0)
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Next state clockwise.
    pub fn next(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }

    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }
}

#[inline]
fn turn_clockwise((dy, dx): Offset) -> Offset {
    (dx, -dy)
}

pub fn shape_of(kind: PieceKind, rotation: Rotation) -> PieceShape {
    let mut shape = kind.base_shape();
    for _ in 0..rotation.quarter_turns() {
        for offset in shape.iter_mut() {
            *offset = turn_clockwise(*offset);
        }
    }
    shape
}
