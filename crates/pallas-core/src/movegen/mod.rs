//! Pseudo-legal move generation.
//!
//! Moves are split into noisy (captures, en passant, promotions) and quiet
//! (everything else) so that callers can generate them in stages. Legality
//! is decided afterwards by [`Board::make_move_into`].

mod king;
mod pawns;

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, queen_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::{EvaledMove, Move, MoveList};
use crate::piece::PieceKind;
use crate::square::Square;

use self::king::gen_castling;
use self::pawns::{gen_pawn_noisy, gen_pawn_quiet};

const OFFICERS: [PieceKind; 5] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

fn piece_attacks(kind: PieceKind, sq: Square, occupied: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupied),
        PieceKind::Rook => rook_attacks(sq, occupied),
        PieceKind::Queen => queen_attacks(sq, occupied),
        PieceKind::King => king_attacks(sq),
        PieceKind::Pawn => Bitboard::EMPTY,
    }
}

/// Non-pawn moves from the side to move onto `targets`.
fn gen_officers(board: &Board, targets: Bitboard, capture: bool, list: &mut MoveList) {
    let us = board.side_to_move();
    let occupied = board.occupied();
    for kind in OFFICERS {
        for from in board.pieces_of(us, kind) {
            for to in piece_attacks(kind, from, occupied) & targets {
                list.push(if capture { Move::capture(from, to) } else { Move::quiet(from, to) });
            }
        }
    }
}

impl Board {
    /// Captures, en passant and promotions (quiet promotions included).
    pub fn generate_noisy(&self, list: &mut MoveList) {
        gen_pawn_noisy(self, list);
        gen_officers(self, self.side(!self.side_to_move()), true, list);
    }

    /// Every move that is neither a capture nor a promotion, castling included.
    pub fn generate_quiet(&self, list: &mut MoveList) {
        gen_pawn_quiet(self, list);
        gen_officers(self, !self.occupied(), false, list);
        gen_castling(self, list);
    }

    pub fn generate_pseudo_legal(&self, list: &mut MoveList) {
        self.generate_noisy(list);
        self.generate_quiet(list);
    }

    /// Pseudo-legal moves filtered down to the legal ones.
    pub fn generate_legal(&self, list: &mut MoveList) {
        let mut pseudo = MoveList::new();
        self.generate_pseudo_legal(&mut pseudo);
        let mut child = *self;
        for &mv in &pseudo {
            if self.make_move_into(mv, &mut child) {
                list.push(mv);
            }
        }
    }

    /// Every legal move with a zero score.
    pub fn generate_all_legal_moves(&self) -> Vec<EvaledMove> {
        let mut list = MoveList::new();
        self.generate_legal(&mut list);
        list.iter().map(|&mv| EvaledMove::new(mv, 0)).collect()
    }

    /// Whether `mv` is one the generator would produce here. Used to vet
    /// moves that come from tables rather than from this position.
    pub fn is_pseudo_legal(&self, mv: Move) -> bool {
        if mv.is_sentinel() || !self.side(self.side_to_move()).contains(mv.from()) {
            return false;
        }
        let mut list = MoveList::new();
        if mv.is_capture_or_promotion() {
            self.generate_noisy(&mut list);
        } else {
            self.generate_quiet(&mut list);
        }
        list.contains(mv)
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::chess_move::{Move, MoveList};
    use crate::square::Square;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn noisy_and_quiet_partition_pseudo_legal() {
        let board: Board = KIWIPETE.parse().unwrap();
        let (mut noisy, mut quiet, mut all) = (MoveList::new(), MoveList::new(), MoveList::new());
        board.generate_noisy(&mut noisy);
        board.generate_quiet(&mut quiet);
        board.generate_pseudo_legal(&mut all);
        assert_eq!(noisy.len() + quiet.len(), all.len());
        assert!(noisy.iter().all(|mv| mv.is_capture_or_promotion()));
        assert!(quiet.iter().all(|mv| !mv.is_capture_or_promotion()));
    }

    #[test]
    fn starting_position_has_twenty_moves() {
        assert_eq!(Board::starting_position().generate_all_legal_moves().len(), 20);
    }

    #[test]
    fn quiet_promotions_count_as_noisy() {
        let board: Board = "4k3/P7/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let mut noisy = MoveList::new();
        board.generate_noisy(&mut noisy);
        assert_eq!(noisy.len(), 4);
        assert!(noisy.iter().all(|mv| mv.is_promotion() && !mv.is_capture()));
    }

    #[test]
    fn castling_blocked_through_attacked_square() {
        let board: Board = "4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1".parse().unwrap();
        let mut quiet = MoveList::new();
        board.generate_quiet(&mut quiet);
        assert!(!quiet.contains(Move::castle(Square::E1, Square::G1)));
        assert!(quiet.contains(Move::castle(Square::E1, Square::C1)));
    }

    #[test]
    fn pseudo_legality_of_foreign_moves() {
        let board = Board::starting_position();
        assert!(board.is_pseudo_legal(Move::double_push(Square::E2, Square::E4)));
        assert!(!board.is_pseudo_legal(Move::quiet(Square::E2, Square::E4)));
        assert!(!board.is_pseudo_legal(Move::quiet(Square::E7, Square::E5)));
        assert!(!board.is_pseudo_legal(Move::quiet(Square::F1, Square::C4)));
        assert!(!board.is_pseudo_legal(Move::NULL));
        assert!(!board.is_pseudo_legal(Move::NONE));
    }
}
