//! Move ordering tables: killers, counter moves and butterfly history.
//!
//! One set per worker, fresh for every search.

use pallas_core::{Board, EvaledMove, Move, PieceKind, Square};

use crate::search::MAX_HEIGHT;
use crate::search::see::see_sign;

pub const HASH_MOVE_SCORE: i32 = 1_000_000;
const GOOD_NOISY_SCORE: i32 = 500_000;
const KILLER_SCORES: [i32; 2] = [300_000, 299_000];
const COUNTER_SCORE: i32 = 298_000;
/// Plain quiet moves score at most this; killers and counters score above.
pub const SPECIAL_MOVE_FLOOR: i32 = 290_000;
const BAD_NOISY_SCORE: i32 = -500_000;

/// History saturates here in both directions.
const HISTORY_MAX: i32 = 16_384;

const VICTIM_WEIGHT: [i32; PieceKind::COUNT] = [1, 3, 3, 5, 9, 0];

/// Most valuable victim first, least valuable attacker breaking ties.
/// Promotions count the promoted piece as an extra victim.
pub fn mvv_lva(board: &Board, mv: Move) -> i32 {
    let victim = if mv.is_en_passant() {
        Some(PieceKind::Pawn)
    } else {
        board.piece_on(mv.to())
    };
    let attacker = board.piece_on(mv.from()).unwrap_or(PieceKind::Pawn);
    let promotion = mv.promotion_kind().map_or(0, |kind| VICTIM_WEIGHT[kind.index()] * 16);
    victim.map_or(0, |kind| VICTIM_WEIGHT[kind.index()] * 16) + promotion
        - VICTIM_WEIGHT[attacker.index()]
}

pub struct MoveOrdering {
    killers: Box<[[Move; 2]; MAX_HEIGHT + 1]>,
    counters: Box<[[Move; Square::COUNT]; Square::COUNT]>,
    history: Box<[[[i32; Square::COUNT]; Square::COUNT]; 2]>,
}

impl MoveOrdering {
    pub fn new() -> MoveOrdering {
        MoveOrdering {
            killers: Box::new([[Move::NONE; 2]; MAX_HEIGHT + 1]),
            counters: Box::new([[Move::NONE; Square::COUNT]; Square::COUNT]),
            history: Box::new([[[0; Square::COUNT]; Square::COUNT]; 2]),
        }
    }

    pub fn killers(&self, height: usize) -> [Move; 2] {
        self.killers[height.min(MAX_HEIGHT)]
    }

    /// Reply that last refuted the move just played, or `NONE`.
    pub fn counter(&self, pos: &Board) -> Move {
        let last = pos.last_move();
        if last.is_sentinel() {
            return Move::NONE;
        }
        self.counters[last.from().index()][last.to().index()]
    }

    pub fn history(&self, pos: &Board, mv: Move) -> i32 {
        self.history[pos.side_to_move().index()][mv.from().index()][mv.to().index()]
    }

    fn adjust_history(&mut self, pos: &Board, mv: Move, delta: i32) {
        let entry = &mut self.history[pos.side_to_move().index()][mv.from().index()][mv.to().index()];
        *entry = (*entry + delta).clamp(-HISTORY_MAX, HISTORY_MAX);
    }

    /// Credit the quiet `best` move that raised alpha at `height` and debit
    /// the other quiet moves tried before it.
    pub fn update(&mut self, pos: &Board, quiets_tried: &[Move], best: Move, depth: i32, height: usize) {
        let bonus = depth * depth;
        self.adjust_history(pos, best, bonus);
        for &mv in quiets_tried.iter().filter(|&&mv| mv != best) {
            self.adjust_history(pos, mv, -bonus);
        }

        let killers = &mut self.killers[height.min(MAX_HEIGHT)];
        if killers[0] != best {
            killers[1] = killers[0];
            killers[0] = best;
        }

        let last = pos.last_move();
        if !last.is_sentinel() {
            self.counters[last.from().index()][last.to().index()] = best;
        }
    }

    /// Ordering score of `mv` in `pos`, highest first.
    pub fn score(&self, pos: &Board, mv: Move, hash_move: Move, height: usize) -> i32 {
        if mv == hash_move {
            return HASH_MOVE_SCORE;
        }
        if mv.is_capture_or_promotion() {
            let base = if see_sign(pos, mv) { GOOD_NOISY_SCORE } else { BAD_NOISY_SCORE };
            return base + mvv_lva(pos, mv);
        }
        let killers = self.killers(height);
        if let Some(slot) = killers.iter().position(|&k| k == mv) {
            return KILLER_SCORES[slot];
        }
        if mv == self.counter(pos) {
            return COUNTER_SCORE;
        }
        self.history(pos, mv)
    }

    /// Re-score the root list in place. The caller sorts.
    pub fn score_root_moves(&self, pos: &Board, moves: &mut [EvaledMove], hash_move: Move) {
        for em in moves.iter_mut() {
            em.score = self.score(pos, em.mv, hash_move, 0);
        }
    }
}

impl Default for MoveOrdering {
    fn default() -> Self {
        MoveOrdering::new()
    }
}

/// Gaps from Ciura's sequence, enough for any legal move count.
const SHELL_GAPS: [usize; 4] = [23, 10, 4, 1];

/// Descending by score. Root lists arrive nearly sorted from the previous
/// iteration, where a gapped insertion sort does little work.
pub fn sort_moves(moves: &mut [EvaledMove]) {
    for gap in SHELL_GAPS {
        for i in gap..moves.len() {
            let current = moves[i];
            let mut j = i;
            while j >= gap && moves[j - gap].score < current.score {
                moves[j] = moves[j - gap];
                j -= gap;
            }
            moves[j] = current;
        }
    }
}
