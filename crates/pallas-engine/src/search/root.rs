//! Root search and the per-worker iterative deepening loop.

use std::sync::mpsc::Sender;

use pallas_core::{EvaledMove, Move, MoveList};
use rand::seq::SliceRandom;
use tracing::trace;

use crate::search::aspiration::AspirationWindow;
use crate::search::control::Aborted;
use crate::search::negamax::{SearchContext, lmr};
use crate::search::ordering::{SPECIAL_MOVE_FLOOR, sort_moves};
use crate::search::see::see_sign;
use crate::search::tt::Bound;
use crate::search::{DRAW, MAX_HEIGHT, loss_in};

/// Helper worker `id` cycles through pattern `id % 16`: whenever the depth
/// just completed plus `cycle` is a multiple of `SKIP_DEPTHS[cycle]`, the
/// next iteration jumps `SKIP_SIZE[cycle]` depths further ahead.
const SKIP_SIZE: [i32; 16] = [1, 1, 1, 2, 2, 2, 1, 3, 2, 2, 1, 3, 3, 2, 2, 1];
const SKIP_DEPTHS: [i32; 16] = [1, 2, 2, 4, 4, 3, 2, 5, 4, 3, 2, 6, 5, 4, 3, 2];

/// One worker's completed depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    /// `Move::NONE` when the root has no legal move.
    pub mv: Move,
    pub value: i32,
    pub depth: i32,
    pub pv: Vec<Move>,
}

/// Search the root moves at `depth` inside `(alpha, beta)`. The list is
/// re-scored and sorted for the next iteration before returning. When the
/// root is in check, evasions that do not lose material are extended.
pub fn root_search(
    ctx: &mut SearchContext<'_>,
    depth: i32,
    mut alpha: i32,
    beta: i32,
    moves: &mut [EvaledMove],
) -> Result<Iteration, Aborted> {
    ctx.frames[0].pv.clear();
    let pos = ctx.frames[0].pos;
    let in_check = pos.is_in_check();
    let alpha_orig = alpha;
    let pv_node = beta > alpha + 1;

    let mut best = Move::NONE;
    let mut quiets = MoveList::new();
    let mut move_count = 0;

    for &EvaledMove { mv, score } in moves.iter() {
        if !ctx.make_child(0, mv) {
            continue;
        }
        move_count += 1;
        let child_in_check = ctx.frames[1].pos.is_in_check();
        let quiet = !mv.is_capture_or_promotion();

        let mut reduction = 0;
        if !in_check && move_count > 1 && quiet && !child_in_check && score <= SPECIAL_MOVE_FLOOR {
            if depth >= 3 {
                reduction = (lmr(depth, move_count) - 1).clamp(0, depth - 2);
            } else if move_count >= 9 + 3 * depth {
                continue;
            }
        }

        if quiet {
            quiets.push(mv);
        }

        let extension = i32::from(in_check && see_sign(&pos, mv));
        let value = ctx.search_child(
            depth - 1 + extension,
            reduction,
            alpha,
            beta,
            0,
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
            ctx.assign_pv(0, mv);
        }
    }

    if move_count == 0 {
        let value = if in_check { loss_in(0) } else { DRAW };
        return Ok(Iteration {
            mv: Move::NONE,
            value,
            depth,
            pv: Vec::new(),
        });
    }

    if !best.is_none() && !best.is_capture_or_promotion() {
        ctx.ordering.update(&pos, quiets.as_slice(), best, depth, 0);
    }
    ctx.ordering.score_root_moves(&pos, moves, best);
    sort_moves(moves);

    let bound = if alpha == alpha_orig {
        Bound::Alpha
    } else if alpha >= beta {
        Bound::Beta
    } else {
        Bound::Exact
    };
    ctx.tt().set(pos.hash(), alpha, depth, best, bound, 0);

    let pv = match ctx.frames[0].pv.as_slice() {
        [] if best.is_none() => Vec::new(),
        [] => vec![best],
        line => line.to_vec(),
    };
    Ok(Iteration {
        mv: best,
        value: alpha,
        depth,
        pv,
    })
}

/// Repeat the root search with a widening window until the value lands
/// inside it.
pub fn aspiration_search(
    ctx: &mut SearchContext<'_>,
    depth: i32,
    previous: i32,
    moves: &mut [EvaledMove],
) -> Result<Iteration, Aborted> {
    let mut window = AspirationWindow::new(depth, previous);
    loop {
        let iteration = root_search(ctx, depth, window.alpha, window.beta, moves)?;
        if window.accepts(iteration.value) {
            return Ok(iteration);
        }
        trace!(
            worker = ctx.id,
            depth,
            value = iteration.value,
            alpha = window.alpha,
            beta = window.beta,
            "aspiration re-search"
        );
        window.widen(iteration.value);
    }
}

/// Depths 1, 2, 3, ... until the orchestrator stops listening or the hard
/// limit unwinds the recursion. Helpers shuffle their root moves once and
/// skip depths so the workers spread over different iterations.
pub fn iterative_deepening(
    ctx: &mut SearchContext<'_>,
    moves: &mut [EvaledMove],
    results: &Sender<Iteration>,
) -> Result<(), Aborted> {
    let helper = ctx.id != 0;
    if helper {
        moves.shuffle(&mut rand::rng());
    }
    let cycle = (ctx.id % SKIP_SIZE.len()) as i32;

    let mut previous = 0;
    let mut depth = 1;
    while depth < MAX_HEIGHT as i32 {
        let iteration = aspiration_search(ctx, depth, previous, moves)?;
        previous = iteration.value;
        ctx.flush_nodes();
        if results.send(iteration).is_err() {
            break;
        }

        if helper && (depth + cycle) % SKIP_DEPTHS[cycle as usize] == 0 {
            depth += SKIP_SIZE[cycle as usize];
        }
        depth += 1;
    }
    Ok(())
}
