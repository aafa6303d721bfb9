//! Castling generation.

use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::chess_move::{Move, MoveList};
use crate::piece::{Color, PieceKind};
use crate::square::Square;

struct CastlePath {
    right: CastleRights,
    king_to: Square,
    rook_from: Square,
    /// Squares between king and rook that must be empty.
    between: &'static [Square],
    /// The square the king crosses, which must not be attacked.
    crossed: Square,
}

const WHITE_PATHS: [CastlePath; 2] = [
    CastlePath {
        right: CastleRights::WHITE_KING,
        king_to: Square::G1,
        rook_from: Square::H1,
        between: &[Square::F1, Square::G1],
        crossed: Square::F1,
    },
    CastlePath {
        right: CastleRights::WHITE_QUEEN,
        king_to: Square::C1,
        rook_from: Square::A1,
        between: &[Square::B1, Square::C1, Square::D1],
        crossed: Square::D1,
    },
];

const BLACK_PATHS: [CastlePath; 2] = [
    CastlePath {
        right: CastleRights::BLACK_KING,
        king_to: Square::G8,
        rook_from: Square::H8,
        between: &[Square::F8, Square::G8],
        crossed: Square::F8,
    },
    CastlePath {
        right: CastleRights::BLACK_QUEEN,
        king_to: Square::C8,
        rook_from: Square::A8,
        between: &[Square::B8, Square::C8, Square::D8],
        crossed: Square::D8,
    },
];

/// Castling moves whose path is clear and whose king neither starts in nor
/// crosses check. Landing in check is caught by `make_move_into`.
pub(super) fn gen_castling(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let rights = board.castling();
    if rights.is_empty() {
        return;
    }
    let (paths, king_from) = match us {
        Color::White => (&WHITE_PATHS, Square::E1),
        Color::Black => (&BLACK_PATHS, Square::E8),
    };
    if !board.pieces_of(us, PieceKind::King).contains(king_from) || board.is_in_check() {
        return;
    }

    let occupied = board.occupied();
    let rooks = board.pieces_of(us, PieceKind::Rook);
    for path in paths {
        if rights.contains(path.right)
            && rooks.contains(path.rook_from)
            && path.between.iter().all(|&sq| !occupied.contains(sq))
            && !board.is_square_attacked(path.crossed, !us)
        {
            list.push(Move::castle(king_from, path.king_to));
        }
    }
}
