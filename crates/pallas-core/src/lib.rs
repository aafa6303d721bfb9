//! Chess rules: board representation, FEN, hashing, attack tables and
//! staged pseudo-legal move generation with copy-make execution.

mod attacks;
mod bitboard;
mod board;
mod castle_rights;
mod chess_move;
mod error;
mod fen;
mod make_move;
mod movegen;
mod perft;
mod piece;
mod square;
mod zobrist;

pub use attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks};
pub use bitboard::Bitboard;
pub use board::Board;
pub use castle_rights::CastleRights;
pub use chess_move::{EvaledMove, MAX_MOVES, Move, MoveList};
pub use error::{BoardError, FenError};
pub use fen::STARTING_FEN;
pub use perft::{divide, perft};
pub use piece::{Color, PieceKind};
pub use square::Square;
