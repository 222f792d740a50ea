//! Innings pitched in baseball's outs notation.
//!
//! `6.2` means six innings and two outs, not 6.2 decimal innings. The value
//! is kept as a whole number of outs so that sums and comparisons are exact;
//! only arithmetic that needs real innings goes through `true_innings()`.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Add;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InningsPitched {
    outs: u32,
}

impl InningsPitched {
    pub const ZERO: InningsPitched = InningsPitched { outs: 0 };

    pub fn from_outs(outs: u32) -> Self {
        Self { outs }
    }

    /// Whole innings plus 0, 1 or 2 extra outs.
    pub fn from_parts(whole: u32, extra_outs: u32) -> Option<Self> {
        if extra_outs > 2 {
            return None;
        }
        whole
            .checked_mul(3)
            .and_then(|o| o.checked_add(extra_outs))
            .map(Self::from_outs)
    }

    /// Convert the display decimal (`5.1`, `6.2`, `7.0`) to innings.
    /// Returns `None` for negative, non-finite or non-outs fractions (`5.3`, `5.25`).
    pub fn from_display(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX / 3) {
            return None;
        }
        let tenths = (value * 10.0).round();
        if (value * 10.0 - tenths).abs() > 1e-6 {
            return None;
        }
        let tenths = tenths as u64;
        let whole = (tenths / 10) as u32;
        let extra = (tenths % 10) as u32;
        Self::from_parts(whole, extra)
    }

    pub fn outs(self) -> u32 {
        self.outs
    }

    pub fn whole(self) -> u32 {
        self.outs / 3
    }

    pub fn extra_outs(self) -> u32 {
        self.outs % 3
    }

    /// The outs-notation number, `W + E/10`.
    pub fn display_value(self) -> f64 {
        f64::from(self.whole()) + f64::from(self.extra_outs()) / 10.0
    }

    /// Innings as a real fraction, `W + E/3`. Use this for rate stats.
    pub fn true_innings(self) -> f64 {
        f64::from(self.outs) / 3.0
    }
}

impl Add for InningsPitched {
    type Output = InningsPitched;

    fn add(self, rhs: Self) -> Self::Output {
        InningsPitched::from_outs(self.outs.saturating_add(rhs.outs))
    }
}

impl fmt::Display for InningsPitched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.whole(), self.extra_outs())
    }
}

/// Serialized in outs notation (`"6.2"`), the way box scores print it.
impl Serialize for InningsPitched {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
