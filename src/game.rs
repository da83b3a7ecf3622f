//! Falling-block game engine.
//!
//! Pure and synchronous: the embedding application owns the timer and the
//! input source and feeds [`Command`]s into a [`Session`].

mod board;
mod config;
mod piece;
mod pieces;
mod session;

pub use board::{Board, Cell};
pub use config::{
    Config, ConfigError, DEFAULT_COLS, DEFAULT_FALL_DELAY, DEFAULT_ROWS, MAX_DIMENSION,
};
pub use piece::{is_legal, FallingPiece, Position};
pub use pieces::{
    Color, PieceKind, PieceProvider, PieceShape, RandomPieceProvider, SequencePieceProvider,
};
pub use session::{
    bonus_fall_delay, Command, GameEvent, GameState, Session, BONUS_BASE_DELAY, MIN_FALL_DELAY,
    SCORE_PER_SPEED_STEP,
};

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    /// Color used for filler cells in test boards.
    pub const FILL: Color = Color::Green;

    pub fn empty_board() -> Board {
        Board::new(DEFAULT_ROWS, DEFAULT_COLS)
    }

    pub fn fill_row(board: &mut Board, row: usize) {
        for col in 0..board.cols() {
            board.set(row, col, Cell::Locked(FILL));
        }
    }

    pub fn fill_row_with_gap(board: &mut Board, row: usize, gap_col: usize) {
        for col in 0..board.cols() {
            if col != gap_col {
                board.set(row, col, Cell::Locked(FILL));
            }
        }
    }

    /// Session on `board` whose later pieces cycle through `pieces`.
    pub fn scripted_session(board: Board, piece: FallingPiece, pieces: Vec<PieceKind>) -> Session {
        Session::with_board(board, piece, Box::new(SequencePieceProvider::new(pieces)))
    }
}
