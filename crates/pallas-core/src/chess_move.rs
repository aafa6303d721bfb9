//! Moves packed into 16 bits, plus fixed-capacity move lists.

use std::fmt;

use crate::piece::PieceKind;
use crate::square::Square;

const FROM_MASK: u16 = 0x003F;
const TO_SHIFT: u32 = 6;
const FLAG_SHIFT: u32 = 12;

// Flag nibble. Bit 2 marks a capture, bit 3 a promotion; the low two bits
// select the promotion piece (knight, bishop, rook, queen).
const QUIET: u16 = 0;
const DOUBLE_PUSH: u16 = 1;
const KING_CASTLE: u16 = 2;
const QUEEN_CASTLE: u16 = 3;
const CAPTURE: u16 = 4;
const EN_PASSANT: u16 = 5;
const PROMOTION: u16 = 8;

/// A move encoded in 16 bits.
///
/// ```text
/// bits  0-5:  from square
/// bits  6-11: to square
/// bits 12-15: flags (quiet, double push, castles, capture, en passant, promotions)
/// ```
///
/// Two sentinels never produced by move generation: [`Move::NONE`] ends an
/// iteration, [`Move::NULL`] passes the turn.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// "No move".
    pub const NONE: Move = Move(0);
    /// Pass the turn. From and to are both b1, which no real move has.
    pub const NULL: Move = Move(1 | (1 << TO_SHIFT));

    #[inline]
    const fn pack(from: Square, to: Square, flag: u16) -> Move {
        Move(from.index() as u16 | ((to.index() as u16) << TO_SHIFT) | (flag << FLAG_SHIFT))
    }

    pub const fn quiet(from: Square, to: Square) -> Move {
        Move::pack(from, to, QUIET)
    }

    pub const fn double_push(from: Square, to: Square) -> Move {
        Move::pack(from, to, DOUBLE_PUSH)
    }

    pub const fn capture(from: Square, to: Square) -> Move {
        Move::pack(from, to, CAPTURE)
    }

    pub const fn en_passant(from: Square, to: Square) -> Move {
        Move::pack(from, to, EN_PASSANT)
    }

    /// Castling, given as the king's own from and to squares.
    pub const fn castle(from: Square, to: Square) -> Move {
        let flag = if to.index() > from.index() { KING_CASTLE } else { QUEEN_CASTLE };
        Move::pack(from, to, flag)
    }

    /// A promotion to `kind` (knight through queen).
    pub const fn promotion(from: Square, to: Square, kind: PieceKind, capture: bool) -> Move {
        let piece_bits = (kind as u16).saturating_sub(1) & 3;
        let capture_bit = if capture { CAPTURE } else { 0 };
        Move::pack(from, to, PROMOTION | capture_bit | piece_bits)
    }

    #[inline]
    pub const fn from_raw(raw: u16) -> Move {
        Move(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    const fn flag(self) -> u16 {
        self.0 >> FLAG_SHIFT
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_unchecked((self.0 & FROM_MASK) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_unchecked(((self.0 >> TO_SHIFT) & FROM_MASK) as u8)
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Move::NONE.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == Move::NULL.0
    }

    /// Either sentinel.
    #[inline]
    pub const fn is_sentinel(self) -> bool {
        self.is_none() || self.is_null()
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flag() & CAPTURE != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.flag() & PROMOTION != 0
    }

    /// Captures, en passant and promotions: the moves ordered as "noisy".
    #[inline]
    pub const fn is_capture_or_promotion(self) -> bool {
        self.flag() & (CAPTURE | PROMOTION) != 0
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.flag() == EN_PASSANT
    }

    #[inline]
    pub const fn is_double_push(self) -> bool {
        self.flag() == DOUBLE_PUSH
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self.flag(), KING_CASTLE | QUEEN_CASTLE)
    }

    /// The piece a pawn turns into, if this is a promotion.
    pub const fn promotion_kind(self) -> Option<PieceKind> {
        if !self.is_promotion() {
            return None;
        }
        Some(match self.flag() & 3 {
            0 => PieceKind::Knight,
            1 => PieceKind::Bishop,
            2 => PieceKind::Rook,
            _ => PieceKind::Queen,
        })
    }

    /// Long algebraic notation as used by UCI, e.g. `e2e4` or `e7e8q`.
    /// Sentinels render as `0000`.
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(kind) = self.promotion_kind() {
            write!(f, "{}", kind.fen_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("Move(null)");
        }
        write!(f, "Move({self})")
    }
}

/// A move paired with an ordering score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaledMove {
    pub mv: Move,
    pub score: i32,
}

impl EvaledMove {
    pub const fn new(mv: Move, score: i32) -> EvaledMove {
        EvaledMove { mv, score }
    }
}

/// Upper bound on pseudo-legal moves in any reachable position.
pub const MAX_MOVES: usize = 256;

/// Fixed-capacity list of moves, kept inline so generation never allocates.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub const fn new() -> MoveList {
        MoveList {
            moves: [Move::NONE; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES);
        if self.len < MAX_MOVES {
            self.moves[self.len] = mv;
            self.len += 1;
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
