//! Attack sets for every piece kind.
//!
//! Leapers come straight from precomputed tables. Sliders use the classical
//! ray approach: walk each direction's empty-board ray and cut it at the
//! nearest blocker.

mod tables;

use crate::bitboard::Bitboard;
use crate::piece::Color;
use crate::square::Square;

use self::tables::{
    EAST, KING_ATTACKS, KNIGHT_ATTACKS, NORTH, NORTH_EAST, NORTH_WEST, PAWN_ATTACKS, RAYS, SOUTH,
    SOUTH_EAST, SOUTH_WEST, WEST,
};

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard::new(KNIGHT_ATTACKS[sq.index()])
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    Bitboard::new(KING_ATTACKS[sq.index()])
}

/// Squares a pawn of `color` standing on `sq` captures on.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    Bitboard::new(PAWN_ATTACKS[color.index()][sq.index()])
}

#[inline]
fn ray_attacks(dir: usize, sq: Square, occupied: Bitboard) -> u64 {
    let ray = RAYS[dir][sq.index()];
    let blockers = ray & occupied.inner();
    if blockers == 0 {
        return ray;
    }
    let nearest = if dir < SOUTH {
        blockers.trailing_zeros()
    } else {
        63 - blockers.leading_zeros()
    };
    ray ^ RAYS[dir][nearest as usize]
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard::new(
        ray_attacks(NORTH, sq, occupied)
            | ray_attacks(EAST, sq, occupied)
            | ray_attacks(SOUTH, sq, occupied)
            | ray_attacks(WEST, sq, occupied),
    )
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard::new(
        ray_attacks(NORTH_EAST, sq, occupied)
            | ray_attacks(NORTH_WEST, sq, occupied)
            | ray_attacks(SOUTH_EAST, sq, occupied)
            | ray_attacks(SOUTH_WEST, sq, occupied),
    )
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaper_counts() {
        assert_eq!(knight_attacks(Square::E4).count(), 8);
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(king_attacks(Square::E4).count(), 8);
        assert_eq!(king_attacks(Square::H8).count(), 3);
    }

    #[test]
    fn pawn_attacks_do_not_wrap() {
        assert_eq!(pawn_attacks(Color::White, Square::A2), Square::B3.bitboard());
        assert_eq!(pawn_attacks(Color::White, Square::H2), Square::G3.bitboard());
        assert_eq!(
            pawn_attacks(Color::Black, Square::E5),
            Square::D4.bitboard() | Square::F4.bitboard()
        );
        assert!(pawn_attacks(Color::White, Square::E8).is_empty());
    }

    #[test]
    fn rook_on_empty_board_sees_fourteen() {
        assert_eq!(rook_attacks(Square::D4, Bitboard::EMPTY).count(), 14);
        assert_eq!(rook_attacks(Square::A1, Bitboard::EMPTY).count(), 14);
    }

    #[test]
    fn rook_stops_at_blockers_in_both_directions() {
        let occ = Square::D6.bitboard() | Square::D2.bitboard() | Square::B4.bitboard() | Square::G4.bitboard();
        let attacks = rook_attacks(Square::D4, occ);
        assert!(attacks.contains(Square::D6));
        assert!(!attacks.contains(Square::D7));
        assert!(attacks.contains(Square::D2));
        assert!(!attacks.contains(Square::D1));
        assert!(attacks.contains(Square::B4));
        assert!(!attacks.contains(Square::A4));
        assert!(attacks.contains(Square::G4));
        assert!(!attacks.contains(Square::H4));
        assert_eq!(attacks.count(), 9);
    }

    #[test]
    fn bishop_stops_at_blockers() {
        let occ = Square::F6.bitboard() | Square::B2.bitboard();
        let attacks = bishop_attacks(Square::D4, occ);
        assert!(attacks.contains(Square::F6));
        assert!(!attacks.contains(Square::G7));
        assert!(attacks.contains(Square::B2));
        assert!(!attacks.contains(Square::A1));
        assert!(attacks.contains(Square::A7));
        assert!(attacks.contains(Square::G1));
    }

    #[test]
    fn queen_is_union() {
        let occ = Square::E5.bitboard();
        assert_eq!(
            queen_attacks(Square::C3, occ),
            rook_attacks(Square::C3, occ) | bishop_attacks(Square::C3, occ)
        );
    }
}
