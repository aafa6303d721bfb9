//! Pawn move generation, split into noisy and quiet halves.

use crate::attacks::pawn_attacks;
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::{Move, MoveList};
use crate::piece::{Color, PieceKind};

/// Push direction, promotion rank and the rank single pushes land on before
/// a double push.
fn geometry(us: Color) -> (i8, Bitboard, Bitboard) {
    match us {
        Color::White => (8, Bitboard::RANK_8, Bitboard::RANK_3),
        Color::Black => (-8, Bitboard::RANK_1, Bitboard::RANK_6),
    }
}

fn push_promotions(list: &mut MoveList, mv: impl Fn(PieceKind) -> Move) {
    for kind in PieceKind::PROMOTIONS {
        list.push(mv(kind));
    }
}

/// Captures, en passant and every promotion.
pub(super) fn gen_pawn_noisy(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let pawns = board.pieces_of(us, PieceKind::Pawn);
    let enemy = board.side(!us);
    let (up, promo_rank, _) = geometry(us);

    let promo_pushes = pawns.shift(up) & !board.occupied() & promo_rank;
    for to in promo_pushes {
        let from = to.offset(-up);
        push_promotions(list, |kind| Move::promotion(from, to, kind, false));
    }

    for from in pawns {
        for to in pawn_attacks(us, from) & enemy {
            if promo_rank.contains(to) {
                push_promotions(list, |kind| Move::promotion(from, to, kind, true));
            } else {
                list.push(Move::capture(from, to));
            }
        }
    }

    if let Some(ep) = board.en_passant() {
        for from in pawn_attacks(!us, ep) & pawns {
            list.push(Move::en_passant(from, ep));
        }
    }
}

/// Non-promoting single and double pushes.
pub(super) fn gen_pawn_quiet(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let pawns = board.pieces_of(us, PieceKind::Pawn);
    let empty = !board.occupied();
    let (up, promo_rank, double_rank) = geometry(us);

    let singles = pawns.shift(up) & empty;
    for to in singles & !promo_rank {
        list.push(Move::quiet(to.offset(-up), to));
    }

    let doubles = (singles & double_rank).shift(up) & empty;
    for to in doubles {
        list.push(Move::double_push(to.offset(-2 * up), to));
    }
}
