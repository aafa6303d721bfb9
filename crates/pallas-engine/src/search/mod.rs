//! Parallel alpha-beta search.
//!
//! Every worker runs its own iterative deepening over the same root and
//! shares the transposition table and breadcrumbs with the others; the
//! orchestrator in [`pool`] keeps the deepest result any of them reports.

pub mod aspiration;
pub mod breadcrumbs;
pub mod control;
pub mod negamax;
pub mod ordering;
pub mod picker;
pub mod pool;
pub mod root;
pub mod see;
pub mod tt;

use pallas_core::Move;

/// Value of delivering mate on the spot. Mate in `n` plies scores `MATE - n`.
pub const MATE: i32 = 32_000;

/// Values at or beyond this are forced mates.
pub const VALUE_WIN: i32 = MATE - 150;

/// Deepest ply the search will visit.
pub const MAX_HEIGHT: usize = 128;

pub const DRAW: i32 = 0;

/// Score of the side to move being mated `height` plies from the root.
#[inline]
pub const fn loss_in(height: usize) -> i32 {
    -MATE + height as i32
}

/// Plies to the mate a value announces: positive when delivering it,
/// negative when receiving it. Only meaningful for mate values.
#[inline]
pub const fn depth_to_mate(value: i32) -> i32 {
    if value >= VALUE_WIN {
        MATE - value
    } else {
        -MATE - value
    }
}

/// Principal variation collected below one ply.
#[derive(Clone)]
pub struct PvLine {
    moves: [Move; MAX_HEIGHT + 1],
    len: usize,
}

impl PvLine {
    pub const fn new() -> PvLine {
        PvLine {
            moves: [Move::NONE; MAX_HEIGHT + 1],
            len: 0,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Become `mv` followed by the child's line.
    pub fn assign(&mut self, mv: Move, child: &PvLine) {
        let tail = child.len.min(MAX_HEIGHT);
        self.moves[0] = mv;
        self.moves[1..=tail].copy_from_slice(&child.moves[..tail]);
        self.len = tail + 1;
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for PvLine {
    fn default() -> Self {
        PvLine::new()
    }
}

impl std::fmt::Debug for PvLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Outcome of a completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// `Move::NONE` only when the root has no legal move.
    pub best_move: Move,
    /// Expected reply, the second move of the PV.
    pub ponder_move: Option<Move>,
    /// From the side to move's point of view.
    pub score: i32,
    /// Deepest accepted depth, 0 when nothing was searched.
    pub depth: i32,
    pub nodes: u64,
    pub pv: Vec<Move>,
}

/// Progress report for one accepted depth.
#[derive(Debug, Clone, Copy)]
pub struct SearchInfo<'a> {
    pub score: i32,
    pub depth: i32,
    pub nodes: u64,
    pub pv: &'a [Move],
}
