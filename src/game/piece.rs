//! The piece under player control and the legality rule every placement
//! goes through.

use super::board::Board;
use super::pieces::{Color, PieceKind, PieceShape};

/// Board coordinate of a shape's bounding-box top-left corner. Signed so a
/// tentative placement may hang off the board before it is rejected.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FallingPiece {
    pub kind: PieceKind,
    pub shape: PieceShape,
    pub color: Color,
    pub position: Position,
}

/// A placement is legal when every occupied cell lands on an in-bounds,
/// empty board cell.
pub fn is_legal(board: &Board, piece: &FallingPiece) -> bool {
    piece
        .cells()
        .all(|pos| board.is_empty_at(pos.row, pos.col))
}

impl FallingPiece {
    /// Places `kind` in spawn orientation at `position`, without checking it.
    pub fn new_at(kind: PieceKind, row: i32, col: i32) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            color: kind.color(),
            position: Position { row, col },
        }
    }

    /// Spawn placement: top row, horizontally centred with integer division.
    /// The flag is false when that placement is already blocked.
    pub fn try_spawn(kind: PieceKind, board: &Board) -> (Self, bool) {
        let shape_cols = kind.shape().cols() as i32;
        let col = board.cols() as i32 / 2 - shape_cols / 2;
        let piece = Self::new_at(kind, 0, col);
        let legal = is_legal(board, &piece);
        (piece, legal)
    }

    /// Board positions covered by the piece.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        let origin = self.position;
        self.shape.occupied().map(move |(r, c)| Position {
            row: origin.row + r as i32,
            col: origin.col + c as i32,
        })
    }

    /// Same as [`cells`](Self::cells) for a piece known to be on the board.
    pub fn board_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells()
            .filter(|pos| pos.row >= 0 && pos.col >= 0)
            .map(|pos| (pos.row as usize, pos.col as usize))
    }

    fn moved(&self, drow: i32, dcol: i32) -> Self {
        Self {
            position: Position {
                row: self.position.row + drow,
                col: self.position.col + dcol,
            },
            ..self.clone()
        }
    }

    /// Counter-clockwise turn that keeps the truncated bounding-box centre
    /// where it was.
    fn rotated(&self) -> Self {
        let old_rows = self.shape.rows() as i32;
        let old_cols = self.shape.cols() as i32;
        let shape = self.shape.rotated_ccw();
        let new_rows = shape.rows() as i32;
        let new_cols = shape.cols() as i32;

        let center_row = self.position.row + old_rows / 2;
        let center_col = self.position.col + old_cols / 2;

        Self {
            shape,
            position: Position {
                row: center_row - new_rows / 2,
                col: center_col - new_cols / 2,
            },
            ..self.clone()
        }
    }

    /// Shifts the piece if the shifted placement is legal. Returns whether it moved.
    pub fn try_move(&mut self, board: &Board, drow: i32, dcol: i32) -> bool {
        let moved = self.moved(drow, dcol);
        if is_legal(board, &moved) {
            *self = moved;
            true
        } else {
            false
        }
    }

    /// Rotates if the rotated placement is legal; otherwise nothing changes.
    pub fn rotate(&mut self, board: &Board) -> bool {
        let rotated = self.rotated();
        if is_legal(board, &rotated) {
            *self = rotated;
            true
        } else {
            false
        }
    }
}
