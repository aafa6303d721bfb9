//! Copy-make move execution.

use crate::attacks::pawn_attacks;
use crate::board::Board;
use crate::chess_move::Move;
use crate::piece::{Color, PieceKind};
use crate::square::Square;

/// Rook from and to squares for a castling king landing on `king_to`.
fn castle_rook(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        Square::G1 => Some((Square::H1, Square::F1)),
        Square::C1 => Some((Square::A1, Square::D1)),
        Square::G8 => Some((Square::H8, Square::F8)),
        Square::C8 => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

impl Board {
    /// Copy this position into `child` and play the pseudo-legal `mv` there.
    ///
    /// Returns `false` when the move leaves the mover's own king attacked, in
    /// which case `child` holds garbage and must not be searched.
    pub fn make_move_into(&self, mv: Move, child: &mut Board) -> bool {
        *child = *self;
        if mv.is_sentinel() {
            return false;
        }

        let us = self.side_to_move();
        let them = !us;
        let (from, to) = (mv.from(), mv.to());
        let Some(kind) = self.piece_on(from) else {
            return false;
        };

        child.set_en_passant(None);

        if mv.is_en_passant() {
            let victim = match us {
                Color::White => to.offset(-8),
                Color::Black => to.offset(8),
            };
            child.toggle(them, PieceKind::Pawn, victim);
        } else if mv.is_capture() {
            let Some(captured) = self.piece_on(to) else {
                return false;
            };
            child.toggle(them, captured, to);
        }

        child.toggle(us, kind, from);
        child.toggle(us, mv.promotion_kind().unwrap_or(kind), to);

        if mv.is_castle() {
            let Some((rook_from, rook_to)) = castle_rook(to) else {
                return false;
            };
            child.toggle(us, PieceKind::Rook, rook_from);
            child.toggle(us, PieceKind::Rook, rook_to);
        }

        if mv.is_double_push() {
            let passed = match us {
                Color::White => from.offset(8),
                Color::Black => from.offset(-8),
            };
            // Only record the square when a capture there is actually possible,
            // so transpositions without one share a key.
            if (pawn_attacks(us, passed) & child.pieces_of(them, PieceKind::Pawn)).is_nonempty() {
                child.set_en_passant(Some(passed));
            }
        }

        child.set_castling(self.castling().after_move(from, to));
        child.pass_turn(mv, kind == PieceKind::Pawn || mv.is_capture());

        child
            .king_square(us)
            .is_some_and(|king| !child.is_square_attacked(king, them))
    }

    /// Copy this position into `child` with the turn passed to the opponent.
    pub fn make_null_move_into(&self, child: &mut Board) {
        *child = *self;
        child.set_en_passant(None);
        child.pass_turn(Move::NULL, false);
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::chess_move::Move;
    use crate::piece::{Color, PieceKind};
    use crate::square::Square;
    use crate::zobrist::hash_from_scratch;

    fn play(board: &Board, uci: &str) -> Board {
        let mv = board.find_move(uci).unwrap();
        let mut child = *board;
        assert!(board.make_move_into(mv, &mut child));
        assert_eq!(child.hash(), hash_from_scratch(&child), "key drift after {uci}");
        child
    }

    #[test]
    fn quiet_move_updates_counters() {
        let board = play(&Board::starting_position(), "g1f3");
        assert_eq!(board.piece_on(Square::F3), Some(PieceKind::Knight));
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.halfmove_clock(), 1);
        assert_eq!(board.fullmove_number(), 1);
        let board = play(&board, "b8c6");
        assert_eq!(board.fullmove_number(), 2);
        assert_eq!(board.last_move().to_string(), "b8c6");
    }

    #[test]
    fn double_push_sets_en_passant_only_when_capturable() {
        let board = play(&Board::starting_position(), "e2e4");
        assert_eq!(board.en_passant(), None);

        let board: Board = "4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1".parse().unwrap();
        let board = play(&board, "e2e4");
        assert_eq!(board.en_passant(), Some(Square::E3));
        let board = play(&board, "d4e3");
        assert_eq!(board.piece_on(Square::E4), None);
        assert_eq!(board.piece_on(Square::E3), Some(PieceKind::Pawn));
        assert_eq!(board.halfmove_clock(), 0);
    }

    #[test]
    fn castling_moves_rook_and_drops_rights() {
        let board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let board = play(&board, "e1g1");
        assert_eq!(board.piece_on(Square::F1), Some(PieceKind::Rook));
        assert_eq!(board.piece_on(Square::H1), None);
        assert_eq!(board.castling().to_string(), "kq");
        let board = play(&board, "e8c8");
        assert_eq!(board.piece_on(Square::D8), Some(PieceKind::Rook));
        assert_eq!(board.castling().to_string(), "-");
    }

    #[test]
    fn promotion_replaces_pawn() {
        let board: Board = "1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let board = play(&board, "a7b8q");
        assert_eq!(board.piece_on(Square::B8), Some(PieceKind::Queen));
        assert_eq!(board.pieces(PieceKind::Pawn).count(), 0);
        assert_eq!(board.pieces(PieceKind::Knight).count(), 0);
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let board: Board = "4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1".parse().unwrap();
        let mut child = board;
        let mv = Move::quiet(Square::E2, Square::C3);
        assert!(!board.make_move_into(mv, &mut child));
    }

    #[test]
    fn null_move_flips_side_only() {
        let board: Board = "4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1".parse().unwrap();
        let board = play(&board, "e2e4");
        let mut child = board;
        board.make_null_move_into(&mut child);
        assert_eq!(child.side_to_move(), Color::White);
        assert_eq!(child.en_passant(), None);
        assert_eq!(child.occupied(), board.occupied());
        assert!(child.last_move().is_null());
        assert_eq!(child.hash(), hash_from_scratch(&child));
    }
}
