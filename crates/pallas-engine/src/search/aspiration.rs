//! Aspiration windows around the previous iteration's score.

use crate::search::MATE;

/// Shallower iterations search the full window.
pub const WINDOW_DEPTH: i32 = 6;
/// Initial half-width of the window.
pub const WINDOW_SIZE: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspirationWindow {
    pub alpha: i32,
    pub beta: i32,
    delta: i32,
}

impl AspirationWindow {
    pub fn new(depth: i32, previous: i32) -> AspirationWindow {
        let delta = WINDOW_SIZE;
        if depth >= WINDOW_DEPTH {
            AspirationWindow {
                alpha: (previous - delta).max(-MATE),
                beta: (previous + delta).min(MATE),
                delta,
            }
        } else {
            AspirationWindow {
                alpha: -MATE,
                beta: MATE,
                delta,
            }
        }
    }

    pub fn is_full(&self) -> bool {
        self.alpha <= -MATE && self.beta >= MATE
    }

    /// A value strictly inside the window is exact. A bound already at
    /// mate cannot widen any further, so a fail on that side is accepted.
    pub fn accepts(&self, value: i32) -> bool {
        (value > self.alpha && value < self.beta)
            || (value >= self.beta && self.beta >= MATE)
            || (value <= self.alpha && self.alpha <= -MATE)
            || self.is_full()
    }

    /// Widen after `value` fell outside. A fail low also pulls beta down to
    /// the old midpoint. The step grows by half plus five each time.
    pub fn widen(&mut self, value: i32) {
        if value <= self.alpha {
            self.beta = (self.alpha + self.beta) / 2;
            self.alpha = (self.alpha - self.delta).max(-MATE);
        }
        if value >= self.beta {
            self.beta = (self.beta + self.delta).min(MATE);
        }
        self.delta += self.delta / 2 + 5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shallow_depths_use_full_window() {
        let window = AspirationWindow::new(WINDOW_DEPTH - 1, 30);
        assert!(window.is_full());
        assert!(window.accepts(-MATE));
    }

    #[test]
    fn deep_window_centres_on_previous() {
        let window = AspirationWindow::new(WINDOW_DEPTH, 30);
        assert_eq!((window.alpha, window.beta), (-20, 80));
        assert!(window.accepts(79));
        assert!(!window.accepts(80));
        assert!(!window.accepts(-20));
    }

    #[test]
    fn fail_low_moves_both_bounds() {
        let mut window = AspirationWindow::new(8, 0);
        window.widen(-60);
        assert_eq!((window.alpha, window.beta), (-100, 0));
        window.widen(-150);
        // delta grew to 80.
        assert_eq!((window.alpha, window.beta), (-180, -50));
    }

    #[test]
    fn fail_high_raises_beta_only() {
        let mut window = AspirationWindow::new(8, 0);
        window.widen(50);
        assert_eq!((window.alpha, window.beta), (-50, 100));
    }

    #[test]
    fn window_is_clamped_to_mate() {
        let window = AspirationWindow::new(10, MATE - 5);
        assert_eq!(window.beta, MATE);
    }

    #[test]
    fn fail_at_a_clamped_bound_is_accepted() {
        // Beta is pinned at mate while alpha still sits near the previous score.
        let mut window = AspirationWindow::new(12, -3000);
        while window.beta < MATE {
            window.widen(MATE);
        }
        assert!(!window.is_full());
        assert!(window.accepts(MATE));

        let mut window = AspirationWindow::new(12, 3000);
        while window.alpha > -MATE {
            window.widen(-MATE);
        }
        assert!(window.accepts(-MATE));
        assert!(!window.accepts(window.beta));
    }

    #[test]
    fn widening_always_terminates() {
        for previous in [-MATE, -3000, -1, 0, 42, 3000, MATE] {
            for target in [-MATE, -MATE + 1, -2500, -51, 0, 51, 2500, MATE - 1, MATE] {
                let mut window = AspirationWindow::new(12, previous);
                let mut retries = 0;
                while !window.accepts(target) {
                    window.widen(target);
                    retries += 1;
                    assert!(retries < 64, "previous {previous} target {target}");
                }
            }
        }
    }
}
