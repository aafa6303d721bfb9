//! Staged, lazily generated move order for one node.
//!
//! Moves come out hash move first, then winning captures and promotions,
//! then killers and the counter move, then quiets by history, then the
//! captures that lose material. Each stage only generates what it needs, so
//! a cutoff on the hash move never pays for move generation.

use pallas_core::{Board, MAX_MOVES, Move, MoveList};

use crate::search::ordering::{MoveOrdering, mvv_lva};
use crate::search::see::see_sign;

/// Which stage produced the move most recently returned. The search
/// compares stages, so the declaration order matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    HashMove,
    GoodNoisy,
    Killers,
    Quiet,
    BadNoisy,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Noisy moves only, losing captures dropped. With `checks`, quiet
    /// moves that give check follow.
    Quiescence { checks: bool },
    /// Everything except the hash move, for the singular probe.
    Singular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Hash,
    GenerateNoisy,
    Noisy,
    Specials,
    GenerateQuiet,
    Quiet,
    Bad,
    Done,
}

pub struct MovePicker {
    mode: Mode,
    hash_move: Move,
    height: usize,
    step: Step,
    stage: Stage,
    moves: MoveList,
    scores: [i32; MAX_MOVES],
    cursor: usize,
    bad: MoveList,
    bad_cursor: usize,
    specials: [Move; 3],
    special_cursor: usize,
}

impl MovePicker {
    pub fn new(mode: Mode, hash_move: Move, height: usize) -> MovePicker {
        MovePicker {
            mode,
            hash_move,
            height,
            step: Step::Hash,
            stage: Stage::HashMove,
            moves: MoveList::new(),
            scores: [0; MAX_MOVES],
            cursor: 0,
            bad: MoveList::new(),
            bad_cursor: 0,
            specials: [Move::NONE; 3],
            special_cursor: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn emit(&mut self, stage: Stage, mv: Move) -> Option<Move> {
        self.stage = stage;
        Some(mv)
    }

    /// Selection sort step over the generated list.
    fn pick_best(&mut self) -> Option<Move> {
        let len = self.moves.len();
        if self.cursor >= len {
            return None;
        }
        let best = (self.cursor..len).max_by_key(|&i| self.scores[i]).unwrap_or(self.cursor);
        self.scores.swap(self.cursor, best);
        let moves = self.moves.as_mut_slice();
        moves.swap(self.cursor, best);
        let mv = moves[self.cursor];
        self.cursor += 1;
        Some(mv)
    }

    fn after_noisy(&self) -> Step {
        match self.mode {
            Mode::Normal | Mode::Singular => Step::Specials,
            Mode::Quiescence { checks: true } => Step::GenerateQuiet,
            Mode::Quiescence { checks: false } => Step::Done,
        }
    }

    /// Next pseudo-legal move, or `None` once every stage is exhausted.
    /// The caller still has to reject moves that leave the king in check.
    pub fn next(&mut self, pos: &Board, ordering: &MoveOrdering) -> Option<Move> {
        loop {
            match self.step {
                Step::Hash => {
                    self.step = Step::GenerateNoisy;
                    let mv = self.hash_move;
                    if mv.is_sentinel() || !pos.is_pseudo_legal(mv) {
                        continue;
                    }
                    let usable = match self.mode {
                        Mode::Normal => true,
                        Mode::Quiescence { .. } if mv.is_capture_or_promotion() => see_sign(pos, mv),
                        Mode::Quiescence { checks } => checks && gives_check(pos, mv),
                        Mode::Singular => false,
                    };
                    if usable {
                        return self.emit(Stage::HashMove, mv);
                    }
                }
                Step::GenerateNoisy => {
                    self.moves.clear();
                    pos.generate_noisy(&mut self.moves);
                    for (i, &mv) in self.moves.iter().enumerate() {
                        self.scores[i] = mvv_lva(pos, mv);
                    }
                    self.cursor = 0;
                    self.step = Step::Noisy;
                }
                Step::Noisy => {
                    let Some(mv) = self.pick_best() else {
                        self.step = self.after_noisy();
                        continue;
                    };
                    if mv == self.hash_move {
                        continue;
                    }
                    if !see_sign(pos, mv) {
                        if !matches!(self.mode, Mode::Quiescence { .. }) {
                            self.bad.push(mv);
                        }
                        continue;
                    }
                    return self.emit(Stage::GoodNoisy, mv);
                }
                Step::Specials => {
                    if self.special_cursor == 0 {
                        let [first, second] = ordering.killers(self.height);
                        self.specials = [first, second, ordering.counter(pos)];
                    }
                    let Some(&mv) = self.specials.get(self.special_cursor) else {
                        self.step = Step::GenerateQuiet;
                        continue;
                    };
                    self.special_cursor += 1;
                    let seen = self.specials[..self.special_cursor - 1].contains(&mv);
                    if mv.is_sentinel()
                        || seen
                        || mv == self.hash_move
                        || mv.is_capture_or_promotion()
                        || !pos.is_pseudo_legal(mv)
                    {
                        continue;
                    }
                    return self.emit(Stage::Killers, mv);
                }
                Step::GenerateQuiet => {
                    self.moves.clear();
                    pos.generate_quiet(&mut self.moves);
                    for (i, &mv) in self.moves.iter().enumerate() {
                        self.scores[i] = ordering.history(pos, mv);
                    }
                    self.cursor = 0;
                    self.step = Step::Quiet;
                }
                Step::Quiet => {
                    let Some(mv) = self.pick_best() else {
                        self.step = match self.mode {
                            Mode::Quiescence { .. } => Step::Done,
                            Mode::Normal | Mode::Singular => Step::Bad,
                        };
                        continue;
                    };
                    if mv == self.hash_move || self.specials.contains(&mv) {
                        continue;
                    }
                    if matches!(self.mode, Mode::Quiescence { .. }) && !gives_check(pos, mv) {
                        continue;
                    }
                    return self.emit(Stage::Quiet, mv);
                }
                Step::Bad => {
                    let Some(&mv) = self.bad.as_slice().get(self.bad_cursor) else {
                        self.step = Step::Done;
                        continue;
                    };
                    self.bad_cursor += 1;
                    return self.emit(Stage::BadNoisy, mv);
                }
                Step::Done => {
                    self.stage = Stage::Done;
                    return None;
                }
            }
        }
    }
}

fn gives_check(pos: &Board, mv: Move) -> bool {
    let mut child = *pos;
    pos.make_move_into(mv, &mut child) && child.is_in_check()
}
