//! Property tests: the rotation algebra and the line-clear loop must hold
//! for arbitrary inputs, not just the handful of cases the unit tests pick.

use proptest::prelude::*;

use blockfall::{Board, Coord, Piece, PieceKind, HEIGHT, WIDTH};

fn coord_strategy() -> impl Strategy<Value = Coord> {
    (-1000i16..1000, -1000i16..1000).prop_map(|(x, y)| Coord::new(x, y))
}

fn board_strategy() -> impl Strategy<Value = Board> {
    // Dense boards, so full rows actually show up instead of being a
    // one-in-a-thousand accident.
    proptest::collection::vec(
        proptest::collection::vec(proptest::bool::weighted(0.85), WIDTH),
        HEIGHT,
    )
    .prop_map(
        |rows| {
            let mut board = Board::new();
            for (y, row) in rows.iter().enumerate() {
                for (x, &filled) in row.iter().enumerate() {
                    if filled {
                        board.set(x, y, Some(PieceKind::L));
                    }
                }
            }
            board
        },
    )
}

proptest! {
    #[test]
    fn clockwise_and_counter_clockwise_are_inverses(c in coord_strategy()) {
        prop_assert_eq!(c.rotated_cw().rotated_ccw(), c);
        prop_assert_eq!(c.rotated_ccw().rotated_cw(), c);
    }

    #[test]
    fn four_quarter_turns_are_the_identity(c in coord_strategy()) {
        let cw4 = c.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
        let ccw4 = c.rotated_ccw().rotated_ccw().rotated_ccw().rotated_ccw();
        prop_assert_eq!(cw4, c);
        prop_assert_eq!(ccw4, c);
    }

    #[test]
    fn rotation_preserves_distance_from_the_anchor(c in coord_strategy()) {
        let norm = |p: Coord| i32::from(p.x).pow(2) + i32::from(p.y).pow(2);
        prop_assert_eq!(norm(c.rotated_cw()), norm(c));
        prop_assert_eq!(norm(c.rotated_ccw()), norm(c));
    }

    #[test]
    fn rotating_a_piece_never_moves_its_anchor(
        anchor in (0i16..WIDTH as i16, 0i16..HEIGHT as i16),
        kind_index in 0usize..7,
        turns in 0usize..8,
    ) {
        let mut piece = Piece::new(PieceKind::ALL[kind_index], Coord::new(anchor.0, anchor.1));
        for turn in 0..turns {
            if turn % 2 == 0 {
                piece.rotate_cw();
            } else {
                piece.rotate_ccw();
            }
        }
        prop_assert_eq!(piece.anchor, Coord::new(anchor.0, anchor.1));
        prop_assert_eq!(piece.cells()[0], piece.anchor);
    }

    #[test]
    fn clear_full_rows_removes_exactly_the_full_rows(board in board_strategy()) {
        let full_before = (0..HEIGHT).filter(|&y| board.is_row_full(y)).count() as u32;
        let filled_before = (0..HEIGHT)
            .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| board.is_occupied(x, y))
            .count();

        let mut board = board;
        let cleared = board.clear_full_rows();

        prop_assert_eq!(cleared, full_before);
        for y in 0..HEIGHT {
            prop_assert!(!board.is_row_full(y));
        }

        let filled_after = (0..HEIGHT)
            .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| board.is_occupied(x, y))
            .count();
        prop_assert_eq!(filled_after, filled_before - (cleared as usize) * WIDTH);
    }
}
