//! Per-challenge countdown measured in tenths of a second.
use serde::{Deserialize, Serialize};

use crate::config::TimerConfig;
use crate::numbers::{ceil_tenths_to_secs, ratio_to_pct};

/// One timer step (100 ms with the default tick).
pub type Tenths = u32;

pub const TENTHS_PER_SECOND: Tenths = 10;

/// Below this share of the limit the countdown counts as running low.
const LOW_TIME_RATIO: f64 = 0.3;

/// Seconds allowed per challenge at `level`, floored at `min_secs`.
#[must_use]
pub fn time_limit_for_level(level: u32, cfg: &TimerConfig) -> u32 {
    let step = cfg.levels_per_second.max(1);
    cfg.base_secs.saturating_sub(level / step).max(cfg.min_secs)
}

/// Result of advancing a countdown by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickState {
    Running,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    limit: Tenths,
    remaining: Tenths,
}

impl Countdown {
    /// A full countdown of `secs` seconds.
    #[must_use]
    pub const fn from_secs(secs: u32) -> Self {
        let limit = secs.saturating_mul(TENTHS_PER_SECOND);
        Self {
            limit,
            remaining: limit,
        }
    }

    #[must_use]
    pub fn for_level(level: u32, cfg: &TimerConfig) -> Self {
        Self::from_secs(time_limit_for_level(level, cfg))
    }

    /// Advance one tick. The final tenth expires rather than reaching zero on a running tick.
    pub fn tick(&mut self) -> TickState {
        if self.remaining <= 1 {
            self.remaining = 0;
            return TickState::Expired;
        }
        self.remaining -= 1;
        TickState::Running
    }

    #[must_use]
    pub const fn limit(&self) -> Tenths {
        self.limit
    }

    #[must_use]
    pub const fn remaining(&self) -> Tenths {
        self.remaining
    }

    #[must_use]
    pub const fn elapsed(&self) -> Tenths {
        self.limit.saturating_sub(self.remaining)
    }

    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Whole seconds left, rounded up as shown on the clock.
    #[must_use]
    pub fn seconds_display(&self) -> u32 {
        ceil_tenths_to_secs(self.remaining)
    }

    #[must_use]
    pub fn fraction_remaining(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        f64::from(self.remaining) / f64::from(self.limit)
    }

    /// Progress bar fill in whole percent.
    #[must_use]
    pub fn percent_remaining(&self) -> u8 {
        ratio_to_pct(self.fraction_remaining())
    }

    #[must_use]
    pub fn is_low(&self) -> bool {
        self.fraction_remaining() < LOW_TIME_RATIO
    }
}
