//! Time management: turn a game clock into search limits.

use std::time::Duration;

use pallas_core::Board;

use crate::eval::phase::{MAX_PHASE, game_phase};
use crate::search::control::SearchLimits;

/// Soft and hard budgets for one move.
///
/// Without `moves_to_go` the number of moves still to play is estimated
/// from the game phase, so the opening is played more conservatively:
///
/// | Condition   | base | scale | phase 24 | phase 12 | phase 0 |
/// |-------------|------|-------|----------|----------|---------|
/// | With inc    | 15   | 20    | 35       | 25       | 15      |
/// | No inc      | 18   | 22    | 40       | 29       | 18      |
///
/// The hard budget is capped at 12% of the clock without increment (25%
/// with) and at 2.5x (3x) the soft budget.
pub fn compute_limits(
    remaining: Duration,
    increment: Duration,
    moves_to_go: Option<u32>,
    phase: i32,
) -> (Duration, Duration) {
    let remaining_ms = remaining.as_millis() as f64;
    if remaining_ms < 10.0 {
        let one_ms = Duration::from_millis(1);
        return (one_ms, one_ms);
    }

    let usable = (remaining_ms - 10.0).max(1.0);
    let inc_ms = increment.as_millis() as f64;
    let has_increment = inc_ms > 0.0;

    let mtg = match moves_to_go {
        Some(x) => x.max(1) as f64,
        None => {
            let (base, scale) = if has_increment { (15, 20) } else { (18, 22) };
            (base + scale * phase.clamp(0, MAX_PHASE) / MAX_PHASE) as f64
        }
    };

    let soft = usable / mtg + if has_increment { inc_ms * 0.75 } else { 0.0 };
    let (cap, ratio) = if has_increment { (0.25, 3.0) } else { (0.12, 2.5) };
    let hard = (usable * cap).min(soft * ratio);

    (
        Duration::from_millis(soft.clamp(1.0, usable) as u64),
        Duration::from_millis(hard.clamp(1.0, usable) as u64),
    )
}

/// Limits for the side to move of `board` with `remaining` on its clock.
pub fn limits_from_clock(
    remaining: Duration,
    increment: Duration,
    moves_to_go: Option<u32>,
    board: &Board,
) -> SearchLimits {
    let (soft, hard) = compute_limits(remaining, increment, moves_to_go, game_phase(board));
    SearchLimits {
        soft_time: Some(soft),
        hard_time: Some(hard),
        ..SearchLimits::default()
    }
}
