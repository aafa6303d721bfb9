//! Static evaluation: tapered material, piece-square tables, bishop pair
//! and tempo, returned from the side to move's point of view.

pub mod phase;
pub mod pst;
pub mod score;

use pallas_core::{Bitboard, Board, Color, PieceKind};

use self::phase::{MAX_PHASE, game_phase};
use self::pst::pst_value;
use self::score::{S, Score};

/// Middlegame pawn value, the unit of the futility margin.
pub const PAWN_VALUE_MG: i32 = pst::PAWN_VALUE.mg() as i32;

const BISHOP_PAIR: Score = S(99, 109);
const TEMPO: Score = S(45, 50);

/// Middlegame material value of a piece kind, used for exchange and
/// capture ordering. Kings get a value no exchange can reach.
#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King => 20_000,
        _ => pst::MATERIAL[kind.index()].mg() as i32,
    }
}

fn side_score(board: &Board, color: Color) -> Score {
    let mut score = Score::ZERO;
    for kind in PieceKind::ALL {
        for sq in board.pieces_of(color, kind) {
            score += pst_value(color, kind, sq);
        }
    }
    if board.pieces_of(color, PieceKind::Bishop).more_than_one() {
        score += BISHOP_PAIR;
    }
    score
}

/// Static score of `board` in centipawn-like units, positive when the side to
/// move stands better.
pub fn evaluate(board: &Board) -> i32 {
    let us = board.side_to_move();
    let score = side_score(board, us) - side_score(board, !us) + TEMPO;
    score.taper(game_phase(board), MAX_PHASE)
}

/// The side to move has no rook or queen and at most one minor piece, the
/// zugzwang-prone material where a null move is unsound.
pub fn is_late_endgame(board: &Board) -> bool {
    let us = board.side(board.side_to_move());
    let heavy = (board.pieces(PieceKind::Rook) | board.pieces(PieceKind::Queen)) & us;
    let minors: Bitboard = (board.pieces(PieceKind::Knight) | board.pieces(PieceKind::Bishop)) & us;
    heavy.is_empty() && !minors.more_than_one()
}

#[cfg(test)]
mod tests {
    use pallas_core::Board;

    use super::*;

    #[test]
    fn starting_position_is_tempo_only() {
        let board = Board::starting_position();
        assert_eq!(evaluate(&board), TEMPO.mg() as i32);
    }

    #[test]
    fn symmetric_for_both_sides() {
        let white: Board = "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1"
            .parse()
            .unwrap();
        let black: Board = "rnbqkb1r/pppppppp/5n2/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 1 1"
            .parse()
            .unwrap();
        assert_eq!(evaluate(&white), evaluate(&black));
    }

    #[test]
    fn extra_queen_dominates() {
        let board: Board = "4k3/8/8/8/8/8/8/3QK3 w - - 0 1".parse().unwrap();
        assert!(evaluate(&board) > 2000);
        let board: Board = "4k3/8/8/8/8/8/8/3QK3 b - - 0 1".parse().unwrap();
        assert!(evaluate(&board) < -2000);
    }

    #[test]
    fn late_endgame_detection() {
        let board: Board = "4k3/8/8/8/8/8/4P3/2B1K3 w - - 0 1".parse().unwrap();
        assert!(is_late_endgame(&board));
        let board: Board = "4k3/8/8/8/8/8/4P3/1NB1K3 w - - 0 1".parse().unwrap();
        assert!(!is_late_endgame(&board));
        let board: Board = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
        assert!(!is_late_endgame(&board));
        assert!(!is_late_endgame(&Board::starting_position()));
    }

    #[test]
    fn futility_unit_is_pawn_middlegame_value() {
        assert_eq!(PAWN_VALUE_MG, 166);
        assert_eq!(piece_value(PieceKind::Pawn), 166);
        assert!(piece_value(PieceKind::King) > piece_value(PieceKind::Queen) * 2);
    }
}
