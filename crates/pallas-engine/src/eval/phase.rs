//! Game phase from remaining non-pawn material.

use pallas_core::{Board, PieceKind};

/// Phase of the starting position: four minors at 1, four rooks at 2, two queens at 4.
pub const MAX_PHASE: i32 = 24;

const WEIGHTS: [(PieceKind, i32); 4] = [
    (PieceKind::Knight, 1),
    (PieceKind::Bishop, 1),
    (PieceKind::Rook, 2),
    (PieceKind::Queen, 4),
];

/// `MAX_PHASE` for a full set of pieces down to 0 for pawns and kings only.
/// Promotions cannot push it past the maximum.
pub fn game_phase(board: &Board) -> i32 {
    WEIGHTS
        .iter()
        .map(|&(kind, weight)| board.pieces(kind).count() as i32 * weight)
        .sum::<i32>()
        .min(MAX_PHASE)
}

#[cfg(test)]
mod tests {
    use pallas_core::Board;

    use super::{MAX_PHASE, game_phase};

    #[test]
    fn starting_position_is_full_middlegame() {
        assert_eq!(game_phase(&Board::starting_position()), MAX_PHASE);
    }

    #[test]
    fn pawn_ending_is_zero() {
        let board: Board = "8/4kp2/8/8/8/8/3PK3/8 w - - 0 1".parse().unwrap();
        assert_eq!(game_phase(&board), 0);
    }

    #[test]
    fn queenless_middlegame() {
        let board: Board = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1".parse().unwrap();
        assert_eq!(game_phase(&board), 16);
    }
}
