//! Castling rights as a 4-bit set.

use std::fmt;

use crate::error::FenError;
use crate::piece::Color;
use crate::square::Square;

/// Bit 0 = white king side, 1 = white queen side, 2 = black king side,
/// 3 = black queen side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

/// Rights that survive a move touching each square. A king or rook leaving
/// its home square, or a rook being captured there, clears the matching bits.
const KEEP_MASK: [u8; 64] = {
    let mut mask = [0b1111u8; 64];
    mask[Square::A1.index()] = !CastleRights::WHITE_QUEEN.0 & 0b1111;
    mask[Square::H1.index()] = !CastleRights::WHITE_KING.0 & 0b1111;
    mask[Square::E1.index()] = !(CastleRights::WHITE_KING.0 | CastleRights::WHITE_QUEEN.0) & 0b1111;
    mask[Square::A8.index()] = !CastleRights::BLACK_QUEEN.0 & 0b1111;
    mask[Square::H8.index()] = !CastleRights::BLACK_KING.0 & 0b1111;
    mask[Square::E8.index()] = !(CastleRights::BLACK_KING.0 | CastleRights::BLACK_QUEEN.0) & 0b1111;
    mask
};

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);
    pub const WHITE_KING: CastleRights = CastleRights(0b0001);
    pub const WHITE_QUEEN: CastleRights = CastleRights(0b0010);
    pub const BLACK_KING: CastleRights = CastleRights(0b0100);
    pub const BLACK_QUEEN: CastleRights = CastleRights(0b1000);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, other: CastleRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn with(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 | other.0)
    }

    /// King-side right for `color`.
    #[inline]
    pub const fn king_side(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights::WHITE_KING,
            Color::Black => CastleRights::BLACK_KING,
        }
    }

    /// Queen-side right for `color`.
    #[inline]
    pub const fn queen_side(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights::WHITE_QUEEN,
            Color::Black => CastleRights::BLACK_QUEEN,
        }
    }

    /// Rights left after a move from `from` to `to`.
    #[inline]
    pub const fn after_move(self, from: Square, to: Square) -> CastleRights {
        CastleRights(self.0 & KEEP_MASK[from.index()] & KEEP_MASK[to.index()])
    }

    /// Parse the FEN castling field, e.g. `KQkq`, `Kq` or `-`.
    pub fn from_fen(field: &str) -> Result<CastleRights, FenError> {
        if field == "-" {
            return Ok(CastleRights::NONE);
        }
        if field.is_empty() {
            return Err(FenError::InvalidCastling { field: field.to_string() });
        }
        field.chars().try_fold(CastleRights::NONE, |rights, c| {
            let flag = match c {
                'K' => CastleRights::WHITE_KING,
                'Q' => CastleRights::WHITE_QUEEN,
                'k' => CastleRights::BLACK_KING,
                'q' => CastleRights::BLACK_QUEEN,
                _ => return Err(FenError::InvalidCastling { field: field.to_string() }),
            };
            Ok(rights.with(flag))
        })
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (flag, c) in [
            (CastleRights::WHITE_KING, 'K'),
            (CastleRights::WHITE_QUEEN, 'Q'),
            (CastleRights::BLACK_KING, 'k'),
            (CastleRights::BLACK_QUEEN, 'q'),
        ] {
            if self.contains(flag) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::CastleRights;
    use crate::square::Square;

    #[test]
    fn fen_field_roundtrip() {
        for field in ["KQkq", "Kq", "k", "-", "KQ"] {
            let rights = CastleRights::from_fen(field).unwrap();
            assert_eq!(rights.to_string(), field);
        }
        assert_eq!(CastleRights::from_fen("qK").unwrap().to_string(), "Kq");
    }

    #[test]
    fn rejects_unknown_letters() {
        assert!(CastleRights::from_fen("KQxq").is_err());
        assert!(CastleRights::from_fen("").is_err());
    }

    #[test]
    fn king_move_drops_both_rights() {
        let rights = CastleRights::ALL.after_move(Square::E1, Square::F1);
        assert_eq!(rights.to_string(), "kq");
    }

    #[test]
    fn rook_capture_drops_victim_right() {
        let rights = CastleRights::ALL.after_move(Square::B7, Square::A8);
        assert_eq!(rights.to_string(), "KQk");
    }

    #[test]
    fn unrelated_move_keeps_rights() {
        assert_eq!(CastleRights::ALL.after_move(Square::E2, Square::E4), CastleRights::ALL);
    }
}
