//! Zobrist keys and from-scratch position hashing.

use crate::board::Board;
use crate::piece::{Color, PieceKind};
use crate::square::Square;

pub(crate) struct Keys {
    pub piece: [[[u64; 64]; 6]; 2],
    pub side: u64,
    pub castling: [u64; 16],
    pub ep_file: [u64; 8],
}

const SEED: u64 = 0x7061_6c6c_6173_2121; // "pallas!!"

const fn xorshift64(mut state: u64) -> u64 {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

/// All keys drawn from one xorshift stream, in declaration order.
const fn generate() -> Keys {
    let mut keys = Keys {
        piece: [[[0; 64]; 6]; 2],
        side: 0,
        castling: [0; 16],
        ep_file: [0; 8],
    };
    let mut state = SEED;

    let mut color = 0;
    while color < 2 {
        let mut kind = 0;
        while kind < 6 {
            let mut sq = 0;
            while sq < 64 {
                state = xorshift64(state);
                keys.piece[color][kind][sq] = state;
                sq += 1;
            }
            kind += 1;
        }
        color += 1;
    }

    state = xorshift64(state);
    keys.side = state;

    let mut i = 0;
    while i < 16 {
        state = xorshift64(state);
        keys.castling[i] = state;
        i += 1;
    }

    let mut file = 0;
    while file < 8 {
        state = xorshift64(state);
        keys.ep_file[file] = state;
        file += 1;
    }

    keys
}

pub(crate) static KEYS: Keys = generate();

#[inline]
pub(crate) fn piece(color: Color, kind: PieceKind, sq: Square) -> u64 {
    KEYS.piece[color.index()][kind.index()][sq.index()]
}

#[inline]
pub(crate) fn castling(bits: u8) -> u64 {
    KEYS.castling[bits as usize & 15]
}

#[inline]
pub(crate) fn ep_file(sq: Square) -> u64 {
    KEYS.ep_file[sq.file() as usize]
}

#[inline]
pub(crate) fn side() -> u64 {
    KEYS.side
}

/// Hash of `board` computed from its fields, ignoring the cached key.
pub(crate) fn hash_from_scratch(board: &Board) -> u64 {
    let mut hash = 0;
    for color in Color::ALL {
        for kind in PieceKind::ALL {
            for sq in board.pieces_of(color, kind) {
                hash ^= piece(color, kind, sq);
            }
        }
    }
    if board.side_to_move() == Color::Black {
        hash ^= side();
    }
    hash ^= castling(board.castling().bits());
    if let Some(ep) = board.en_passant() {
        hash ^= ep_file(ep);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct() {
        let mut all: Vec<u64> = KEYS.piece.iter().flatten().flatten().copied().collect();
        all.push(KEYS.side);
        all.extend(KEYS.castling);
        all.extend(KEYS.ep_file);
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
        assert!(!all.contains(&0));
    }

    #[test]
    fn starting_position_key_matches_scratch() {
        let board = Board::starting_position();
        assert_ne!(board.hash(), 0);
        assert_eq!(board.hash(), hash_from_scratch(&board));
    }
}
