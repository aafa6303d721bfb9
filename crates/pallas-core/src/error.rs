//! Errors for FEN parsing and board validation.

use crate::piece::Color;

/// Reasons a FEN string cannot be turned into a [`Board`](crate::Board).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("expected 6 FEN fields, found {found}")]
    WrongFieldCount { found: usize },

    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },

    /// `rank_index` counts from the top of the FEN string (0 = eighth rank).
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength { rank_index: usize, length: usize },

    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar { character: char },

    #[error("invalid active color: \"{found}\"")]
    InvalidColor { found: String },

    #[error("invalid castling field: \"{field}\"")]
    InvalidCastling { field: String },

    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant { found: String },

    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter { field: &'static str, found: String },

    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),
}

/// Structural problems with an otherwise well-formed position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("expected 1 king for {color}, found {count}")]
    InvalidKingCount { color: Color, count: u32 },

    #[error("pawns found on back rank")]
    PawnsOnBackRank,

    #[error("side not to move is in check")]
    OpponentInCheck,
}

#[cfg(test)]
mod tests {
    use super::{BoardError, FenError};
    use crate::piece::Color;

    #[test]
    fn messages() {
        assert_eq!(
            FenError::WrongFieldCount { found: 4 }.to_string(),
            "expected 6 FEN fields, found 4"
        );
        assert_eq!(
            BoardError::InvalidKingCount { color: Color::Black, count: 0 }.to_string(),
            "expected 1 king for b, found 0"
        );
    }

    #[test]
    fn board_error_converts() {
        let err: FenError = BoardError::PawnsOnBackRank.into();
        assert!(matches!(err, FenError::InvalidBoard(BoardError::PawnsOnBackRank)));
    }
}
