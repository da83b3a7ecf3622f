//! The seven standard pieces, their masks and colors, and the sources that
//! hand them out to a session.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Palette
// ============================================================================

/// Color of a locked cell or a piece. Only identity matters to the engine.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Color {
    Red,
    Yellow,
    Magenta,
    Pink,
    Cyan,
    Green,
    Orange,
}

// ============================================================================
// Shapes
// ============================================================================

/// Immutable occupancy mask of a piece in one orientation, stored row-major.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct PieceShape {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl PieceShape {
    /// Builds a shape from rows of occupancy flags.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is empty or ragged.
    pub fn from_rows(rows: &[&[bool]]) -> Self {
        assert!(!rows.is_empty(), "shape needs at least one row");
        let cols = rows[0].len();
        assert!(cols > 0, "shape needs at least one column");
        assert!(
            rows.iter().all(|row| row.len() == cols),
            "shape rows must all have the same width"
        );

        Self {
            rows: rows.len(),
            cols,
            cells: rows.iter().flat_map(|row| row.iter().copied()).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the mask is set at `(row, col)`. Out of range reads as unset.
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// Offsets `(row, col)` of every occupied cell, top-to-bottom, left-to-right.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(i, _)| (i / cols, i % cols))
    }

    /// Returns the mask turned 90 degrees counter-clockwise.
    ///
    /// For an `R x C` mask the result is `C x R` with
    /// `new[C - 1 - c][r] = old[r][c]`.
    pub fn rotated_ccw(&self) -> Self {
        let new_rows = self.cols;
        let new_cols = self.rows;
        let mut cells = vec![false; new_rows * new_cols];

        for r in 0..self.rows {
            for c in 0..self.cols {
                let new_row = self.cols - 1 - c;
                cells[new_row * new_cols + r] = self.cells[r * self.cols + c];
            }
        }

        Self {
            rows: new_rows,
            cols: new_cols,
            cells,
        }
    }
}

// ============================================================================
// Piece Kinds
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

const X: bool = true;
const E: bool = false;

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Spawn orientation of the piece.
    pub fn shape(&self) -> PieceShape {
        match self {
            PieceKind::I => PieceShape::from_rows(&[&[X, X, X, X]]),
            PieceKind::J => PieceShape::from_rows(&[&[X, E, E], &[X, X, X]]),
            PieceKind::L => PieceShape::from_rows(&[&[E, E, X], &[X, X, X]]),
            PieceKind::O => PieceShape::from_rows(&[&[X, X], &[X, X]]),
            PieceKind::S => PieceShape::from_rows(&[&[E, X, X], &[X, X, E]]),
            PieceKind::T => PieceShape::from_rows(&[&[E, X, E], &[X, X, X]]),
            PieceKind::Z => PieceShape::from_rows(&[&[X, X, E], &[E, X, X]]),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::Red,
            PieceKind::J => Color::Yellow,
            PieceKind::L => Color::Magenta,
            PieceKind::O => Color::Pink,
            PieceKind::S => Color::Cyan,
            PieceKind::T => Color::Green,
            PieceKind::Z => Color::Orange,
        }
    }

    /// Uniform pick over the seven kinds.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> PieceKind;
}

pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Same seed, same piece sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> PieceKind {
        PieceKind::random(&mut self.rng)
    }
}

/// Replays a fixed list of kinds forever. Used to script games in tests.
pub struct SequencePieceProvider {
    pieces: Vec<PieceKind>,
    index: usize,
}

impl SequencePieceProvider {
    /// # Panics
    ///
    /// Panics if `pieces` is empty.
    pub fn new(pieces: Vec<PieceKind>) -> Self {
        assert!(!pieces.is_empty(), "sequence provider needs at least one piece");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> PieceKind {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}
