//! The position: piece placement, side to move, castling, en passant,
//! move counters, hash key and the move that produced it.

use std::fmt;

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::chess_move::Move;
use crate::error::BoardError;
use crate::piece::{Color, PieceKind};
use crate::square::Square;
use crate::zobrist;

/// A complete chess position. Cheap to copy; search keeps one per ply.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pieces: [Bitboard; PieceKind::COUNT],
    sides: [Bitboard; Color::COUNT],
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
    /// [`Move::NONE`] for a freshly built position, [`Move::NULL`] after a pass.
    last_move: Move,
}

impl Board {
    /// The standard starting position.
    pub fn starting_position() -> Board {
        const WHITE_PAWNS: u64 = 0x0000_0000_0000_FF00;
        const BLACK_PAWNS: u64 = 0x00FF_0000_0000_0000;
        // Back-rank pattern on rank 1; shifted by 56 for rank 8.
        const KNIGHTS: u64 = 0x42;
        const BISHOPS: u64 = 0x24;
        const ROOKS: u64 = 0x81;
        const QUEENS: u64 = 0x08;
        const KINGS: u64 = 0x10;

        let both = |rank1: u64| Bitboard::new(rank1 | rank1 << 56);
        let mut board = Board {
            pieces: [
                Bitboard::new(WHITE_PAWNS | BLACK_PAWNS),
                both(KNIGHTS),
                both(BISHOPS),
                both(ROOKS),
                both(QUEENS),
                both(KINGS),
            ],
            sides: [
                Bitboard::new(0x0000_0000_0000_FFFF),
                Bitboard::new(0xFFFF_0000_0000_0000),
            ],
            side_to_move: Color::White,
            castling: CastleRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            last_move: Move::NONE,
        };
        board.hash = zobrist::hash_from_scratch(&board);
        board
    }

    /// Assemble a position from parsed parts. The key is computed here.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        pieces: [Bitboard; PieceKind::COUNT],
        sides: [Bitboard; Color::COUNT],
        side_to_move: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> Board {
        let mut board = Board {
            pieces,
            sides,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            hash: 0,
            last_move: Move::NONE,
        };
        board.hash = zobrist::hash_from_scratch(&board);
        board
    }

    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()]
    }

    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()] & self.sides[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.sides[0] | self.sides[1]
    }

    pub fn piece_on(&self, sq: Square) -> Option<PieceKind> {
        if !self.occupied().contains(sq) {
            return None;
        }
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.pieces[kind.index()].contains(sq))
    }

    pub fn color_on(&self, sq: Square) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&color| self.sides[color.index()].contains(sq))
    }

    /// `None` only for positions that never passed validation.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color, PieceKind::King).lsb()
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Half-moves since the last capture or pawn move.
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Zobrist key of the position.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn last_move(&self) -> Move {
        self.last_move
    }

    /// Pieces of both colours attacking `sq`, with sliders seen through `occupied`.
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let diagonal = self.pieces(PieceKind::Bishop) | self.pieces(PieceKind::Queen);
        let straight = self.pieces(PieceKind::Rook) | self.pieces(PieceKind::Queen);
        (pawn_attacks(Color::Black, sq) & self.pieces_of(Color::White, PieceKind::Pawn))
            | (pawn_attacks(Color::White, sq) & self.pieces_of(Color::Black, PieceKind::Pawn))
            | (knight_attacks(sq) & self.pieces(PieceKind::Knight))
            | (king_attacks(sq) & self.pieces(PieceKind::King))
            | (bishop_attacks(sq, occupied) & diagonal)
            | (rook_attacks(sq, occupied) & straight)
    }

    /// `true` if any piece of `by` attacks `sq`.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let them = self.side(by);
        let occupied = self.occupied();
        (knight_attacks(sq) & them & self.pieces(PieceKind::Knight)).is_nonempty()
            || (king_attacks(sq) & them & self.pieces(PieceKind::King)).is_nonempty()
            || (pawn_attacks(!by, sq) & them & self.pieces(PieceKind::Pawn)).is_nonempty()
            || (rook_attacks(sq, occupied)
                & them
                & (self.pieces(PieceKind::Rook) | self.pieces(PieceKind::Queen)))
                .is_nonempty()
            || (bishop_attacks(sq, occupied)
                & them
                & (self.pieces(PieceKind::Bishop) | self.pieces(PieceKind::Queen)))
                .is_nonempty()
    }

    /// `true` if the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        self.king_square(self.side_to_move)
            .is_some_and(|king| self.is_square_attacked(king, !self.side_to_move))
    }

    /// Parse a UCI move string against this position's legal moves.
    pub fn find_move(&self, uci: &str) -> Option<Move> {
        self.generate_all_legal_moves()
            .into_iter()
            .map(|em| em.mv)
            .find(|mv| mv.to_string() == uci)
    }

    /// Check the structural rules every searchable position obeys.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let count = self.pieces_of(color, PieceKind::King).count();
            if count != 1 {
                return Err(BoardError::InvalidKingCount { color, count });
            }
        }
        if (self.pieces(PieceKind::Pawn) & (Bitboard::RANK_1 | Bitboard::RANK_8)).is_nonempty() {
            return Err(BoardError::PawnsOnBackRank);
        }
        let waiting = !self.side_to_move;
        if let Some(king) = self.king_square(waiting)
            && self.is_square_attacked(king, self.side_to_move)
        {
            return Err(BoardError::OpponentInCheck);
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn toggle(&mut self, color: Color, kind: PieceKind, sq: Square) {
        let bb = sq.bitboard();
        self.pieces[kind.index()] ^= bb;
        self.sides[color.index()] ^= bb;
        self.hash ^= zobrist::piece(color, kind, sq);
    }

    #[inline]
    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        if let Some(old) = self.en_passant {
            self.hash ^= zobrist::ep_file(old);
        }
        if let Some(new) = sq {
            self.hash ^= zobrist::ep_file(new);
        }
        self.en_passant = sq;
    }

    #[inline]
    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.hash ^= zobrist::castling(self.castling.bits()) ^ zobrist::castling(rights.bits());
        self.castling = rights;
    }

    /// Hand the move to the other side, bumping the counters.
    #[inline]
    pub(crate) fn pass_turn(&mut self, mv: Move, reset_clock: bool) {
        self.halfmove_clock = if reset_clock { 0 } else { self.halfmove_clock.saturating_add(1) };
        if self.side_to_move == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = !self.side_to_move;
        self.hash ^= zobrist::side();
        self.last_move = mv;
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\"{self}\")")
    }
}
