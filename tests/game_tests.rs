//! Tests for the building blocks of the engine
//!
//! Test categories:
//! - Piece catalog and providers
//! - Shape rotation
//! - Board queries, locking and row clearing
//! - Falling piece spawn, movement and rotation legality

use blockfall::game::{
    is_legal, test_helpers::*, Board, Cell, Color, FallingPiece, PieceKind, PieceProvider,
    Position, RandomPieceProvider, SequencePieceProvider, DEFAULT_COLS, DEFAULT_ROWS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn vertical_i(row: i32, col: i32) -> FallingPiece {
    FallingPiece {
        shape: PieceKind::I.shape().rotated_ccw(),
        ..FallingPiece::new_at(PieceKind::I, row, col)
    }
}

fn positions(piece: &FallingPiece) -> Vec<(i32, i32)> {
    piece.cells().map(|p| (p.row, p.col)).collect()
}

// ============================================================================
// Piece Catalog Tests
// ============================================================================

mod catalog {
    use super::*;

    #[test]
    fn every_piece_has_four_cells() {
        for kind in PieceKind::ALL {
            assert_eq!(kind.shape().occupied().count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn shape_dimensions_match_standard_set() {
        assert_eq!((PieceKind::I.shape().rows(), PieceKind::I.shape().cols()), (1, 4));
        assert_eq!((PieceKind::O.shape().rows(), PieceKind::O.shape().cols()), (2, 2));
        for kind in [PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::T, PieceKind::Z] {
            assert_eq!((kind.shape().rows(), kind.shape().cols()), (2, 3), "{:?}", kind);
        }
    }

    #[test]
    fn t_piece_mask() {
        let shape = PieceKind::T.shape();
        let cells: Vec<(usize, usize)> = shape.occupied().collect();
        assert_eq!(cells, vec![(0, 1), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn colors_are_one_to_one() {
        let mut colors: Vec<Color> = PieceKind::ALL.iter().map(|k| k.color()).collect();
        colors.dedup();
        assert_eq!(colors.len(), 7);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn random_selection_covers_all_kinds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [0usize; 7];
        for _ in 0..700 {
            let kind = PieceKind::random(&mut rng);
            let idx = PieceKind::ALL.iter().position(|k| *k == kind).unwrap();
            seen[idx] += 1;
        }
        assert!(seen.iter().all(|count| *count > 0), "{:?}", seen);
    }

    #[test]
    fn seeded_provider_is_reproducible() {
        let mut a = RandomPieceProvider::seeded(42);
        let mut b = RandomPieceProvider::seeded(42);
        let first: Vec<PieceKind> = (0..20).map(|_| a.next_piece()).collect();
        let second: Vec<PieceKind> = (0..20).map(|_| b.next_piece()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn sequence_provider_cycles() {
        let mut provider = SequencePieceProvider::new(vec![PieceKind::I, PieceKind::O]);
        assert_eq!(provider.next_piece(), PieceKind::I);
        assert_eq!(provider.next_piece(), PieceKind::O);
        assert_eq!(provider.next_piece(), PieceKind::I);
    }
}

// ============================================================================
// Rotation Tests
// ============================================================================

mod shape_rotation {
    use super::*;

    #[test]
    fn rotation_swaps_dimensions() {
        let rotated = PieceKind::I.shape().rotated_ccw();
        assert_eq!((rotated.rows(), rotated.cols()), (4, 1));
    }

    #[test]
    fn t_rotates_counter_clockwise() {
        // .X.      .X
        // XXX  ->  XX
        //          .X
        let rotated = PieceKind::T.shape().rotated_ccw();
        let cells: Vec<(usize, usize)> = rotated.occupied().collect();
        assert_eq!(cells, vec![(0, 1), (1, 0), (1, 1), (2, 1)]);
    }

    #[test]
    fn four_rotations_restore_every_shape() {
        for kind in PieceKind::ALL {
            let original = kind.shape();
            let turned = original
                .rotated_ccw()
                .rotated_ccw()
                .rotated_ccw()
                .rotated_ccw();
            assert_eq!(turned, original, "{:?}", kind);
        }
    }

    #[test]
    fn rotation_leaves_original_untouched() {
        let original = PieceKind::L.shape();
        let copy = original.clone();
        let _ = original.rotated_ccw();
        assert_eq!(original, copy);
    }
}

// ============================================================================
// Board Tests
// ============================================================================

mod board {
    use super::*;

    #[test]
    fn new_board_is_empty() {
        let board = empty_board();
        assert_eq!(board.rows(), DEFAULT_ROWS);
        assert_eq!(board.cols(), DEFAULT_COLS);
        assert_eq!(board.total_filled_cells(), 0);
    }

    #[test]
    fn is_empty_at_rejects_out_of_bounds() {
        let board = empty_board();
        assert!(board.is_empty_at(0, 0));
        assert!(board.is_empty_at(14, 9));
        assert!(!board.is_empty_at(-1, 0));
        assert!(!board.is_empty_at(0, -1));
        assert!(!board.is_empty_at(15, 0));
        assert!(!board.is_empty_at(0, 10));
    }

    #[test]
    fn lock_marks_cells_with_color() {
        let mut board = empty_board();
        board.lock([(3, 4), (3, 5)], Color::Cyan);

        assert_eq!(board.cell(3, 4), Some(Cell::Locked(Color::Cyan)));
        assert_eq!(board.cell(3, 5), Some(Cell::Locked(Color::Cyan)));
        assert!(!board.is_empty_at(3, 4));
        assert_eq!(board.total_filled_cells(), 2);
    }

    #[test]
    fn incomplete_row_not_cleared() {
        let mut board = empty_board();
        fill_row_with_gap(&mut board, 14, 9);

        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board.filled_count_in_row(14), 9);
    }

    #[test]
    fn single_complete_row_is_cleared() {
        let mut board = empty_board();
        fill_row(&mut board, 14);

        assert_eq!(board.clear_full_rows(), 1);
        assert_eq!(board.total_filled_cells(), 0);
        assert_eq!(board.rows(), DEFAULT_ROWS);
    }

    #[test]
    fn non_contiguous_rows_cleared_in_order() {
        let mut board = empty_board();
        // One marker cell per surviving row, shifted by row index.
        for row in 0..DEFAULT_ROWS {
            if row == 2 || row == 5 {
                fill_row(&mut board, row);
            } else {
                board.set(row, row % DEFAULT_COLS, Cell::Locked(Color::Red));
            }
        }
        let before = board.clone();

        let cleared = board.clear_full_rows();

        assert_eq!(cleared, 2);
        assert_eq!(board.rows(), DEFAULT_ROWS);
        assert_eq!(board.filled_count_in_row(0), 0);
        assert_eq!(board.filled_count_in_row(1), 0);

        let survivors: Vec<&[Cell]> = before
            .iter_rows()
            .enumerate()
            .filter(|(row, _)| *row != 2 && *row != 5)
            .map(|(_, cells)| cells)
            .collect();
        let after: Vec<&[Cell]> = board.iter_rows().skip(2).collect();
        assert_eq!(after, survivors);
    }

    #[test]
    fn rows_above_cleared_line_fall_down() {
        let mut board = empty_board();
        board.set(12, 0, Cell::Locked(Color::Pink));
        fill_row(&mut board, 13);
        board.set(14, 3, Cell::Locked(Color::Cyan));

        board.clear_full_rows();

        assert_eq!(board.cell(13, 0), Some(Cell::Locked(Color::Pink)));
        assert_eq!(board.cell(12, 0), Some(Cell::Empty));
        assert_eq!(board.cell(14, 3), Some(Cell::Locked(Color::Cyan)));
    }

    #[test]
    fn all_rows_filled_and_cleared() {
        let mut board = empty_board();
        for row in 0..DEFAULT_ROWS {
            fill_row(&mut board, row);
        }

        assert_eq!(board.clear_full_rows(), DEFAULT_ROWS);
        assert_eq!(board, empty_board());
    }

    #[test]
    fn row_is_full_only_without_gaps() {
        let mut board = empty_board();
        fill_row(&mut board, 14);
        fill_row_with_gap(&mut board, 13, 0);

        assert!(board.is_row_full(14));
        assert!(!board.is_row_full(13));
        assert!(!board.is_row_full(0));
        assert!(!board.is_row_full(DEFAULT_ROWS));
    }

    #[test]
    fn grid_with_full_rows_two_and_five() {
        let full = vec![Cell::Locked(Color::Yellow); 4];
        let mut grid = vec![vec![Cell::Empty; 4]; 7];
        grid[2] = full.clone();
        grid[5] = full;
        grid[3][1] = Cell::Locked(Color::Red);
        grid[6][0] = Cell::Locked(Color::Cyan);
        let mut board = Board::from_cells(grid);
        assert_eq!((board.rows(), board.cols()), (7, 4));
        assert!(board.is_row_full(2) && board.is_row_full(5));

        assert_eq!(board.clear_full_rows(), 2);

        // Row 3 drops past the cleared row 2, row 6 stays at the bottom.
        assert_eq!(board.cell(4, 1), Some(Cell::Locked(Color::Red)));
        assert_eq!(board.cell(6, 0), Some(Cell::Locked(Color::Cyan)));
        assert_eq!(board.total_filled_cells(), 2);
        assert!((0..7).all(|row| !board.is_row_full(row)));
    }

    #[test]
    #[should_panic(expected = "same width")]
    fn ragged_grid_is_rejected() {
        Board::from_cells(vec![vec![Cell::Empty; 3], vec![Cell::Empty; 2]]);
    }

    #[test]
    #[should_panic(expected = "at least one row")]
    fn empty_grid_is_rejected() {
        Board::from_cells(Vec::new());
    }

    #[test]
    fn custom_dimensions_are_kept() {
        let mut board = Board::new(4, 3);
        fill_row(&mut board, 3);
        board.clear_full_rows();
        assert_eq!((board.rows(), board.cols()), (4, 3));
    }
}

// ============================================================================
// Falling Piece Tests
// ============================================================================

mod falling_piece {
    use super::*;

    #[test]
    fn spawn_is_centered_on_top_row() {
        let board = empty_board();
        let expected = [
            (PieceKind::I, 3),
            (PieceKind::O, 4),
            (PieceKind::J, 4),
            (PieceKind::L, 4),
            (PieceKind::S, 4),
            (PieceKind::T, 4),
            (PieceKind::Z, 4),
        ];
        for (kind, col) in expected {
            let (piece, legal) = FallingPiece::try_spawn(kind, &board);
            assert!(legal, "{:?}", kind);
            assert_eq!(piece.position, Position { row: 0, col }, "{:?}", kind);
            assert_eq!(piece.color, kind.color());
        }
    }

    #[test]
    fn spawn_onto_locked_cells_is_illegal() {
        let mut board = empty_board();
        board.set(0, 5, Cell::Locked(Color::Red));
        let (_, legal) = FallingPiece::try_spawn(PieceKind::I, &board);
        assert!(!legal);
    }

    #[test]
    fn spawn_on_too_narrow_board_is_illegal() {
        let board = Board::new(10, 2);
        let (piece, legal) = FallingPiece::try_spawn(PieceKind::I, &board);
        assert!(!legal);
        assert_eq!(piece.position.col, -1);
    }

    #[test]
    fn piece_moves_left_and_right() {
        let board = empty_board();
        let mut piece = FallingPiece::new_at(PieceKind::O, 5, 4);

        assert!(piece.try_move(&board, 0, -1));
        assert_eq!(piece.position.col, 3);
        assert!(piece.try_move(&board, 0, 1));
        assert!(piece.try_move(&board, 0, 1));
        assert_eq!(piece.position.col, 5);
    }

    #[test]
    fn piece_cannot_move_through_walls() {
        let board = empty_board();
        let mut left = FallingPiece::new_at(PieceKind::O, 5, 0);
        let mut right = FallingPiece::new_at(PieceKind::O, 5, DEFAULT_COLS as i32 - 2);

        assert!(!left.try_move(&board, 0, -1));
        assert_eq!(left.position.col, 0);
        assert!(!right.try_move(&board, 0, 1));
        assert_eq!(right.position.col, DEFAULT_COLS as i32 - 2);
    }

    #[test]
    fn piece_cannot_move_into_filled_cell() {
        let mut board = empty_board();
        board.set(6, 4, Cell::Locked(Color::Red));
        let mut piece = FallingPiece::new_at(PieceKind::O, 4, 4);

        assert!(!piece.try_move(&board, 1, 0));
        assert_eq!(piece.position, Position { row: 4, col: 4 });
    }

    #[test]
    fn i_piece_falls_fourteen_rows_to_floor() {
        let board = empty_board();
        let (mut piece, legal) = FallingPiece::try_spawn(PieceKind::I, &board);
        assert!(legal);
        assert_eq!(piece.position, Position { row: 0, col: 3 });

        for _ in 0..14 {
            assert!(piece.try_move(&board, 1, 0));
        }
        assert!(!piece.try_move(&board, 1, 0));
        assert_eq!(positions(&piece), vec![(14, 3), (14, 4), (14, 5), (14, 6)]);
    }

    #[test]
    fn drop_terminates_resting_on_floor_or_stack() {
        let mut board = empty_board();
        fill_row_with_gap(&mut board, 10, 0);

        for kind in PieceKind::ALL {
            let (mut piece, legal) = FallingPiece::try_spawn(kind, &board);
            assert!(legal);

            let mut calls = 0;
            while piece.try_move(&board, 1, 0) {
                calls += 1;
                assert!(calls <= board.rows(), "{:?} never stopped", kind);
            }

            let resting = piece.cells().any(|p| {
                p.row as usize == board.rows() - 1 || !board.is_empty_at(p.row + 1, p.col)
            });
            assert!(resting, "{:?}", kind);
            assert!(is_legal(&board, &piece));
        }
    }

    #[test]
    fn rotation_keeps_truncated_center() {
        let board = empty_board();
        let mut piece = FallingPiece::new_at(PieceKind::I, 5, 3);

        assert!(piece.rotate(&board));
        assert_eq!(piece.position, Position { row: 3, col: 5 });
        assert_eq!(positions(&piece), vec![(3, 5), (4, 5), (5, 5), (6, 5)]);

        assert!(piece.rotate(&board));
        assert_eq!(piece.position, Position { row: 5, col: 3 });
    }

    #[test]
    fn four_rotations_restore_mask_in_open_space() {
        let board = empty_board();
        for kind in PieceKind::ALL {
            let mut piece = FallingPiece::new_at(kind, 6, 4);
            for _ in 0..4 {
                assert!(piece.rotate(&board), "{:?}", kind);
            }
            assert_eq!(piece.shape, kind.shape(), "{:?}", kind);
        }
    }

    #[test]
    fn rotation_at_spawn_row_is_rejected_for_i() {
        let board = empty_board();
        let (mut piece, _) = FallingPiece::try_spawn(PieceKind::I, &board);
        let before = piece.clone();

        // Vertical I would start two rows above the board.
        assert!(!piece.rotate(&board));
        assert_eq!(piece, before);
    }

    #[test]
    fn rotation_against_left_wall_is_rejected() {
        let board = empty_board();
        let mut piece = vertical_i(3, 0);
        let before = piece.clone();

        assert!(!piece.rotate(&board));
        assert_eq!(piece, before);
    }

    #[test]
    fn rotation_into_locked_cell_is_rejected() {
        let mut board = empty_board();
        board.set(7, 5, Cell::Locked(Color::Orange));
        // Turned T would cover (5,5), (6,4), (6,5) and (7,5).
        let mut piece = FallingPiece::new_at(PieceKind::T, 5, 4);
        let before = piece.clone();

        assert!(!piece.rotate(&board));
        assert_eq!(piece, before);
    }
}
