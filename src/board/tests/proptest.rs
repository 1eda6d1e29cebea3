//! Property-based tests using proptest.
//!
//! Random walks over legal moves exercise make/unmake, the incremental hash,
//! and the occupancy invariants on reachable states.

use proptest::prelude::*;

use crate::board::tables::Tables;
use crate::board::Board;

fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=24usize
}

fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

proptest! {
    /// Unwinding a random walk restores the board exactly.
    #[test]
    fn prop_make_unmake_restores_state(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;

        let tables = Tables::global();
        let mut board = Board::initial(tables);
        let initial = board.clone();
        let mut rng = StdRng::seed_from_u64(seed);

        let mut made = 0;
        for _ in 0..num_moves {
            let moves = board.legal_moves(tables).unwrap();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            board.make_move(tables, mv).unwrap();
            made += 1;
        }
        for _ in 0..made {
            board.unmake_move().unwrap();
        }

        prop_assert_eq!(board.hash(), initial.hash());
        prop_assert_eq!(board.slots, initial.slots);
        prop_assert_eq!(board.slot_piece, initial.slot_piece);
        prop_assert_eq!(board.occupancy_color, initial.occupancy_color);
        prop_assert_eq!(board.occupancy_type, initial.occupancy_type);
        prop_assert_eq!(board.occupancy_all, initial.occupancy_all);
        prop_assert_eq!(board.side_to_move(), initial.side_to_move());
    }

    /// The incremental hash always equals the from-scratch recomputation.
    #[test]
    fn prop_hash_consistency(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;

        let tables = Tables::global();
        let mut board = Board::initial(tables);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = board.legal_moves(tables).unwrap();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            board.make_move(tables, mv).unwrap();
            prop_assert_eq!(board.hash(), board.recompute_hash(tables));
        }
    }

    /// Occupancy disjointness/union invariants hold on every reachable state.
    #[test]
    fn prop_occupancies_stay_consistent(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;

        let tables = Tables::global();
        let mut board = Board::initial(tables);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = board.legal_moves(tables).unwrap();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            board.make_move(tables, mv).unwrap();
            prop_assert!(board.occupancies_consistent());
            // a rebuild from the slot table must agree with the incremental
            // occupancies
            let mut rebuilt = board.clone();
            rebuilt.rebuild_occupancies();
            prop_assert_eq!(rebuilt.occupancy_color, board.occupancy_color);
            prop_assert_eq!(rebuilt.occupancy_type, board.occupancy_type);
            prop_assert_eq!(rebuilt.occupancy_all, board.occupancy_all);
        }
    }

    /// Kings survive every legal line: capture moves never target a king.
    #[test]
    fn prop_kings_are_never_captured(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;
        use crate::board::types::Piece;

        let tables = Tables::global();
        let mut board = Board::initial(tables);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = board.legal_moves(tables).unwrap();
            if moves.is_empty() {
                break;
            }
            prop_assert!(moves.iter().all(|m| m.captured != Some(Piece::King)));
            let mv = moves[rng.gen_range(0..moves.len())];
            board.make_move(tables, mv).unwrap();
            prop_assert_eq!(board.pieces_by_type(Piece::King).popcount(), 2);
        }
    }
}
