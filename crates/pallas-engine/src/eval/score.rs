//! Middlegame/endgame score pair packed into one `i32`.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Middlegame value in the high half, endgame value in the low half.
///
/// Addition works on the packed word directly. Extracting the middlegame half
/// adds `0x8000` first to undo the borrow a negative endgame half leaves in
/// the upper bits.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Score(i32);

impl Score {
    pub const ZERO: Score = Score(0);

    #[inline]
    pub const fn new(mg: i16, eg: i16) -> Score {
        Score(((mg as i32) << 16).wrapping_add(eg as i32))
    }

    #[inline]
    pub const fn mg(self) -> i16 {
        (self.0.wrapping_add(0x8000) >> 16) as i16
    }

    #[inline]
    pub const fn eg(self) -> i16 {
        self.0 as i16
    }

    /// Blend the two halves by game phase, `phase == max` meaning full middlegame.
    #[inline]
    pub fn taper(self, phase: i32, max: i32) -> i32 {
        (self.mg() as i32 * phase + self.eg() as i32 * (max - phase)) / max
    }
}

/// `S(mg, eg)`, the usual shorthand for table literals.
#[allow(non_snake_case)]
#[inline]
pub const fn S(mg: i16, eg: i16) -> Score {
    Score::new(mg, eg)
}

impl Add for Score {
    type Output = Score;
    #[inline]
    fn add(self, rhs: Score) -> Score {
        Score(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Score {
    #[inline]
    fn add_assign(&mut self, rhs: Score) {
        *self = *self + rhs;
    }
}

impl Sub for Score {
    type Output = Score;
    #[inline]
    fn sub(self, rhs: Score) -> Score {
        Score(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Score {
    #[inline]
    fn sub_assign(&mut self, rhs: Score) {
        *self = *self - rhs;
    }
}

impl Neg for Score {
    type Output = Score;
    #[inline]
    fn neg(self) -> Score {
        Score::new(-self.mg(), -self.eg())
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S({}, {})", self.mg(), self.eg())
    }
}

#[cfg(test)]
mod tests {
    use super::S;

    #[test]
    fn halves_survive_mixed_signs() {
        for (mg, eg) in [(100, 200), (-50, -30), (100, -50), (-100, 50), (i16::MAX, i16::MIN)] {
            let s = S(mg, eg);
            assert_eq!((s.mg(), s.eg()), (mg, eg));
        }
    }

    #[test]
    fn arithmetic_is_componentwise() {
        assert_eq!(S(10, -20) + S(30, 40), S(40, 20));
        assert_eq!(S(50, 60) - S(10, 80), S(40, -20));
        assert_eq!(-S(10, -20), S(-10, 20));
    }

    #[test]
    fn taper_endpoints() {
        let s = S(200, -100);
        assert_eq!(s.taper(24, 24), 200);
        assert_eq!(s.taper(0, 24), -100);
        assert_eq!(s.taper(12, 24), 50);
    }
}
