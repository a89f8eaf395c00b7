//! Piece production: where new tetrominoes come from.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::WIDTH;
use crate::coord::Coord;
use crate::piece::{Piece, PieceKind};

/// Fixed spawn anchor: horizontally centered on the top row. Every catalog
/// shape extends only down and sideways from its anchor, so a fresh piece
/// always starts fully inside the grid.
pub const SPAWN_ANCHOR: Coord = Coord::new(WIDTH as i16 / 2 - 1, 0);

/// Build a piece of `kind` at the spawn anchor.
pub fn spawn(kind: PieceKind) -> Piece {
    Piece::new(kind, SPAWN_ANCHOR)
}

/// Supplies the kind of each new piece. The session owns one boxed source;
/// swapping in a deterministic one makes whole games reproducible.
pub trait PieceSource {
    fn next_kind(&mut self) -> PieceKind;
}

/// Uniform draw over the seven kinds from an owned generator, seeded once
/// at construction.
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl PieceSource for RandomSource {
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.gen_range(0..PieceKind::ALL.len())]
    }
}

/// Cycles through a fixed list of kinds. For tests.
pub struct SequenceSource {
    kinds: Vec<PieceKind>,
    index: usize,
}

impl SequenceSource {
    pub fn new(kinds: Vec<PieceKind>) -> Self {
        assert!(!kinds.is_empty());
        Self { kinds, index: 0 }
    }
}

impl PieceSource for SequenceSource {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.index % self.kinds.len()];
        self.index += 1;
        kind
    }
}
