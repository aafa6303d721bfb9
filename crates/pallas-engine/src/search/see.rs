//! Static exchange evaluation.
//!
//! Plays out the capture sequence on one square with each side always
//! recapturing with its least valuable attacker, revealing x-ray attackers as
//! pieces leave the board, and lets either side stop when continuing loses.

use pallas_core::{Bitboard, Board, Color, Move, PieceKind, Square, bishop_attacks, rook_attacks};

use crate::eval::piece_value;

const MAX_EXCHANGE: usize = 32;

fn least_valuable(board: &Board, attackers: Bitboard) -> Option<(Square, PieceKind)> {
    PieceKind::ALL
        .into_iter()
        .find_map(|kind| (attackers & board.pieces(kind)).lsb().map(|sq| (sq, kind)))
}

fn victim_value(board: &Board, mv: Move) -> i32 {
    if mv.is_en_passant() {
        piece_value(PieceKind::Pawn)
    } else {
        board.piece_on(mv.to()).map_or(0, piece_value)
    }
}

/// Net material the side to move wins by playing `mv` and letting the
/// exchange on its destination run its course.
pub fn see(board: &Board, mv: Move) -> i32 {
    let (from, to) = (mv.from(), mv.to());
    let Some(mover) = board.piece_on(from) else {
        return 0;
    };

    let mut occupied = board.occupied().without(from);
    if mv.is_en_passant() {
        let victim = match board.side_to_move() {
            Color::White => Square::from_coords(to.file(), to.rank().wrapping_sub(1)),
            Color::Black => Square::from_coords(to.file(), to.rank() + 1),
        };
        if let Some(sq) = victim {
            occupied = occupied.without(sq);
        }
    }

    let diagonal = board.pieces(PieceKind::Bishop) | board.pieces(PieceKind::Queen);
    let straight = board.pieces(PieceKind::Rook) | board.pieces(PieceKind::Queen);

    let mut gain = [0i32; MAX_EXCHANGE];
    gain[0] = victim_value(board, mv);
    let mut on_square = piece_value(mv.promotion_kind().unwrap_or(mover));
    let mut side = !board.side_to_move();
    let mut attackers = board.attackers_to(to, occupied) & occupied;
    let mut depth = 0;

    while let Some((sq, kind)) = least_valuable(board, attackers & board.side(side)) {
        depth += 1;
        if depth >= MAX_EXCHANGE {
            break;
        }
        gain[depth] = on_square - gain[depth - 1];
        on_square = piece_value(kind);

        occupied = occupied.without(sq);
        if matches!(kind, PieceKind::Pawn | PieceKind::Bishop | PieceKind::Queen) {
            attackers |= bishop_attacks(to, occupied) & diagonal;
        }
        if matches!(kind, PieceKind::Rook | PieceKind::Queen) {
            attackers |= rook_attacks(to, occupied) & straight;
        }
        attackers &= occupied;
        side = !side;
    }

    let mut depth = depth.min(MAX_EXCHANGE - 1);
    while depth > 0 {
        depth -= 1;
        gain[depth] = -(-gain[depth]).max(gain[depth + 1]);
    }
    gain[0]
}

/// `see(board, mv) >= 0`, skipping the exchange when the victim is worth at
/// least as much as the piece taking it.
pub fn see_sign(board: &Board, mv: Move) -> bool {
    if !mv.is_promotion()
        && let Some(mover) = board.piece_on(mv.from())
        && victim_value(board, mv) >= piece_value(mover)
    {
        return true;
    }
    see(board, mv) >= 0
}

#[cfg(test)]
mod tests {
    use pallas_core::Board;

    use super::*;

    fn parse(fen: &str, uci: &str) -> (Board, Move) {
        let board: Board = fen.parse().unwrap();
        let mv = board.find_move(uci).unwrap();
        (board, mv)
    }

    #[test]
    fn free_pawn() {
        let (board, mv) = parse("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", "e4d5");
        assert_eq!(see(&board, mv), piece_value(PieceKind::Pawn));
        assert!(see_sign(&board, mv));
    }

    #[test]
    fn defended_pawn_costs_the_rook() {
        let (board, mv) = parse("4k3/2p5/3p4/8/8/8/8/3RK3 w - - 0 1", "d1d6");
        assert_eq!(
            see(&board, mv),
            piece_value(PieceKind::Pawn) - piece_value(PieceKind::Rook)
        );
        assert!(!see_sign(&board, mv));
    }

    #[test]
    fn xray_battery_wins_exchange() {
        // Rook takes the knight, the black rook recaptures, the queen behind it takes back.
        let (board, mv) = parse("3rk3/8/8/3n4/8/8/3R4/3QK3 w - - 0 1", "d2d5");
        assert_eq!(
            see(&board, mv),
            piece_value(PieceKind::Knight) - piece_value(PieceKind::Rook) + piece_value(PieceKind::Rook)
        );
    }

    #[test]
    fn quiet_moves_onto_guarded_squares() {
        let (board, mv) = parse("4k3/8/8/2p5/8/8/8/2N1K3 w - - 0 1", "c1b3");
        assert_eq!(see(&board, mv), 0);
        let (board, mv) = parse("4k3/8/8/8/2p5/8/8/2N1K3 w - - 0 1", "c1d3");
        assert_eq!(see(&board, mv), -piece_value(PieceKind::Knight));
        assert!(!see_sign(&board, mv));
    }

    #[test]
    fn en_passant_counts_the_pawn() {
        let (board, mv) = parse("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5d6");
        assert_eq!(see(&board, mv), piece_value(PieceKind::Pawn));
    }
}
