//! Interior-node search: PVS alpha-beta with pruning, reductions and
//! extensions, and the quiescence search below the horizon.

use std::collections::HashMap;

use pallas_core::{Board, Move, MoveList, PieceKind};

use crate::eval::{PAWN_VALUE_MG, evaluate, is_late_endgame};
use crate::search::breadcrumbs::Breadcrumbs;
use crate::search::control::{Aborted, SearchControl};
use crate::search::ordering::MoveOrdering;
use crate::search::picker::{Mode, MovePicker, Stage};
use crate::search::see::see_sign;
use crate::search::tt::{Bound, TranspositionTable, TtEntry};
use crate::search::{DRAW, MATE, MAX_HEIGHT, PvLine, loss_in};

/// Nodes counted locally before the shared counter and clock are consulted.
const NODE_BATCH: u64 = 1024;

/// Late-move reduction by remaining depth and move number.
pub fn lmr(depth: i32, move_count: i32) -> i32 {
    match (depth, move_count) {
        (d, m) if d >= 5 && m >= 16 => 3,
        (d, m) if d >= 4 && m >= 9 => 2,
        (d, m) if d >= 3 && m >= 4 => 1,
        _ => 0,
    }
}

/// One ply of the worker's recursion stack.
pub struct Frame {
    pub pos: Board,
    pub pv: PvLine,
}

/// Everything one worker needs to search. The referenced tables are shared
/// with the other workers; the frames and ordering tables are its own.
pub struct SearchContext<'a> {
    pub id: usize,
    pub frames: Vec<Frame>,
    pub ordering: MoveOrdering,
    tt: &'a TranspositionTable,
    crumbs: &'a Breadcrumbs,
    played: &'a HashMap<u64, u32>,
    pub control: &'a SearchControl,
    pending_nodes: u64,
    /// Deep nodes found already marked by another worker.
    pub crumb_hits: u64,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        id: usize,
        root: &Board,
        tt: &'a TranspositionTable,
        crumbs: &'a Breadcrumbs,
        played: &'a HashMap<u64, u32>,
        control: &'a SearchControl,
    ) -> SearchContext<'a> {
        let frames = (0..=MAX_HEIGHT)
            .map(|_| Frame {
                pos: *root,
                pv: PvLine::new(),
            })
            .collect();
        SearchContext {
            id,
            frames,
            ordering: MoveOrdering::new(),
            tt,
            crumbs,
            played,
            control,
            pending_nodes: 0,
            crumb_hits: 0,
        }
    }

    pub fn tt(&self) -> &'a TranspositionTable {
        self.tt
    }

    /// Count one node and unwind if the search has to stop. The clock and
    /// the node budget are only read once per batch.
    #[inline]
    fn count_node(&mut self) -> Result<(), Aborted> {
        self.pending_nodes += 1;
        if self.pending_nodes >= NODE_BATCH {
            self.flush_nodes();
            if self.control.should_abort() {
                return Err(Aborted);
            }
        } else if self.control.is_stopped() {
            return Err(Aborted);
        }
        Ok(())
    }

    pub fn flush_nodes(&mut self) {
        self.control.add_nodes(self.pending_nodes);
        self.pending_nodes = 0;
    }

    /// `frames[height].pv = [mv] ++ frames[height + 1].pv`
    pub fn assign_pv(&mut self, height: usize, mv: Move) {
        let (head, tail) = self.frames.split_at_mut(height + 1);
        head[height].pv.assign(mv, &tail[0].pv);
    }

    /// Make `mv` from the position at `height` into the next frame.
    #[inline]
    pub fn make_child(&mut self, height: usize, mv: Move) -> bool {
        let (head, tail) = self.frames.split_at_mut(height + 1);
        head[height].pos.make_move_into(mv, &mut tail[0].pos)
    }

    fn is_draw(&self, height: usize) -> bool {
        let pos = &self.frames[height].pos;
        if pos.halfmove_clock() >= 100 {
            return true;
        }

        let heavy = pos.pieces(PieceKind::Pawn) | pos.pieces(PieceKind::Rook) | pos.pieces(PieceKind::Queen);
        let minors = pos.pieces(PieceKind::Knight) | pos.pieces(PieceKind::Bishop);
        if heavy.is_empty() && !minors.more_than_one() {
            return true;
        }

        // Walk back to the last irreversible move or null move.
        for earlier in self.frames[..height].iter().rev() {
            if earlier.pos.hash() == pos.hash() {
                return true;
            }
            if earlier.pos.halfmove_clock() == 0 || earlier.pos.last_move().is_null() {
                break;
            }
        }

        self.played.get(&pos.hash()).is_some_and(|&count| count >= 2)
    }

    pub fn alpha_beta(
        &mut self,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        height: usize,
        in_check: bool,
    ) -> Result<i32, Aborted> {
        self.count_node()?;
        self.frames[height].pv.clear();
        let pos = self.frames[height].pos;

        if height >= MAX_HEIGHT {
            return Ok(evaluate(&pos));
        }
        if self.is_draw(height) {
            return Ok(DRAW);
        }

        let alpha_orig = alpha;
        let pv_node = beta > alpha + 1;

        let mut hash_entry = self.tt.get(pos.hash(), height);
        if let Some(entry) = hash_entry
            && entry.depth as i32 >= depth
        {
            match entry.bound {
                Bound::Exact => return Ok(entry.value),
                Bound::Alpha if entry.value <= alpha => return Ok(alpha),
                Bound::Beta if entry.value >= beta => return Ok(beta),
                _ => {}
            }
        }

        if !pos.last_move().is_null() && depth >= 4 && !in_check && !is_late_endgame(&pos) {
            pos.make_null_move_into(&mut self.frames[height + 1].pos);
            let reduction = (1 + depth / 3).max(3);
            let value = -self.alpha_beta(depth - reduction, -beta, -beta + 1, height + 1, false)?;
            if value >= beta {
                return Ok(beta);
            }
        }

        if depth <= 0 {
            return self.quiescence(alpha, beta, height, in_check, true);
        }

        let crumbs = self.crumbs;
        let crumb = crumbs.enter(self.id, pos.hash(), depth);
        if crumb.mark().elsewhere {
            self.crumb_hits += 1;
        }

        let iid_depth = if pv_node && depth >= 6 {
            Some(depth - depth / 4 - 1)
        } else if !pv_node && depth >= 8 {
            Some((depth - 5) / 2)
        } else {
            None
        };
        if let Some(iid_depth) = iid_depth
            && hash_entry.is_none_or(|e| e.mv.is_none())
            && !in_check
        {
            self.alpha_beta(iid_depth, alpha, beta, height, in_check)?;
            self.frames[height].pv.clear();
            hash_entry = self.tt.get(pos.hash(), height);
        }
        let hash_move = hash_entry.map_or(Move::NONE, |e| e.mv);

        let mut picker = MovePicker::new(Mode::Normal, hash_move, height);
        let mut quiets = MoveList::new();
        let mut lazy_eval = None;
        let mut best = Move::NONE;
        let mut move_count = 0;

        while let Some(mv) = picker.next(&pos, &self.ordering) {
            if !self.make_child(height, mv) {
                continue;
            }
            move_count += 1;
            let child_in_check = self.frames[height + 1].pos.is_in_check();
            let quiet = !mv.is_capture_or_promotion();

            let mut reduction = 0;
            if !in_check && move_count > 1 && picker.stage() > Stage::Killers && quiet && !child_in_check {
                if depth >= 3 {
                    reduction = (lmr(depth, move_count) + i32::from(!pv_node)).clamp(0, depth - 2);
                } else {
                    if move_count >= 9 + 3 * depth {
                        continue;
                    }
                    let eval = *lazy_eval.get_or_insert_with(|| evaluate(&pos));
                    if eval + PAWN_VALUE_MG * depth <= alpha {
                        continue;
                    }
                }
            }

            let mut new_depth = depth - 1;
            if child_in_check && picker.stage() < Stage::BadNoisy && see_sign(&pos, mv) {
                new_depth += 1;
            } else if let Some(entry) = hash_entry
                && is_singular_candidate(entry, mv, depth)
                && self.is_singular(depth, height, mv, entry.value)?
            {
                new_depth += 1;
            }

            if quiet {
                quiets.push(mv);
            }

            let value = self.search_child(
                new_depth,
                reduction,
                alpha,
                beta,
                height,
                child_in_check,
                pv_node && move_count == 1,
                pv_node,
            )?;

            if value > alpha {
                alpha = value;
                best = mv;
                if alpha >= beta {
                    break;
                }
                self.assign_pv(height, mv);
            }
        }
        drop(crumb);

        if move_count == 0 {
            return Ok(if in_check { loss_in(height) } else { DRAW });
        }

        if !best.is_none() && !best.is_capture_or_promotion() {
            self.ordering.update(&pos, quiets.as_slice(), best, depth, height);
        }

        let bound = if alpha == alpha_orig {
            Bound::Alpha
        } else if alpha >= beta {
            Bound::Beta
        } else {
            Bound::Exact
        };
        self.tt.set(pos.hash(), alpha, depth, best, bound, height);
        Ok(alpha)
    }

    /// Reduced null window, then full-depth null window, then full window,
    /// each step only when the previous one beat alpha. The child position
    /// is already in `frames[height + 1]`.
    #[allow(clippy::too_many_arguments)]
    pub fn search_child(
        &mut self,
        depth: i32,
        reduction: i32,
        alpha: i32,
        beta: i32,
        height: usize,
        child_in_check: bool,
        first_pv_move: bool,
        pv_node: bool,
    ) -> Result<i32, Aborted> {
        let mut value = alpha + 1;
        if reduction > 0 {
            value = -self.alpha_beta(depth - reduction, -alpha - 1, -alpha, height + 1, child_in_check)?;
        }
        if value > alpha && !first_pv_move {
            value = -self.alpha_beta(depth, -alpha - 1, -alpha, height + 1, child_in_check)?;
        }
        if pv_node && value > alpha {
            value = -self.alpha_beta(depth, -beta, -alpha, height + 1, child_in_check)?;
        }
        Ok(value)
    }

    /// Whether every alternative to the hash move fails to reach a margin
    /// below its stored value, searched at reduced depth.
    fn is_singular(&mut self, depth: i32, height: usize, hash_move: Move, hash_value: i32) -> Result<bool, Aborted> {
        let pos = self.frames[height].pos;
        let made = self.frames[height + 1].pos;
        let r_beta = (hash_value - depth).max(-MATE);

        let mut picker = MovePicker::new(Mode::Singular, hash_move, height);
        let mut value = -MATE;
        let mut quiets = 0;
        while let Some(mv) = picker.next(&pos, &self.ordering) {
            if !self.make_child(height, mv) {
                continue;
            }
            let child_in_check = self.frames[height + 1].pos.is_in_check();
            value = -self.alpha_beta(depth / 2 - 1, -r_beta - 1, -r_beta, height + 1, child_in_check)?;
            if value > r_beta {
                break;
            }
            if picker.stage() > Stage::GoodNoisy {
                quiets += 1;
                if quiets >= 6 {
                    break;
                }
            }
        }

        self.frames[height + 1].pos = made;
        Ok(value <= r_beta)
    }

    /// Captures and promotions (plus evasions when in check, and quiet
    /// checks on the first ply when `checks` is set) until the position is
    /// quiet.
    pub fn quiescence(
        &mut self,
        mut alpha: i32,
        beta: i32,
        height: usize,
        in_check: bool,
        checks: bool,
    ) -> Result<i32, Aborted> {
        self.count_node()?;
        self.frames[height].pv.clear();
        let pos = self.frames[height].pos;

        if height >= MAX_HEIGHT {
            return Ok(evaluate(&pos));
        }
        if self.is_draw(height) {
            return Ok(DRAW);
        }

        let mut hash_move = Move::NONE;
        if let Some(entry) = self.tt.get(pos.hash(), height) {
            hash_move = entry.mv;
            match entry.bound {
                Bound::Exact => return Ok(entry.value),
                Bound::Alpha if entry.value <= alpha => return Ok(alpha),
                Bound::Beta if entry.value >= beta => return Ok(beta),
                _ => {}
            }
        }

        let mode = if in_check {
            Mode::Normal
        } else {
            let stand_pat = evaluate(&pos);
            if stand_pat >= beta {
                return Ok(beta);
            }
            alpha = alpha.max(stand_pat);
            Mode::Quiescence { checks }
        };

        let mut picker = MovePicker::new(mode, hash_move, height);
        let mut legal = 0;
        while let Some(mv) = picker.next(&pos, &self.ordering) {
            if !self.make_child(height, mv) {
                continue;
            }
            legal += 1;
            let child_in_check = self.frames[height + 1].pos.is_in_check();
            let value = -self.quiescence(-beta, -alpha, height + 1, child_in_check, false)?;
            if value > alpha {
                alpha = value;
                if alpha >= beta {
                    return Ok(beta);
                }
                self.assign_pv(height, mv);
            }
        }

        if in_check && legal == 0 {
            return Ok(loss_in(height));
        }
        Ok(alpha)
    }
}

fn is_singular_candidate(entry: TtEntry, mv: Move, depth: i32) -> bool {
    depth >= 8 && mv == entry.mv && entry.depth as i32 >= depth - 2 && entry.bound != Bound::Alpha
}
