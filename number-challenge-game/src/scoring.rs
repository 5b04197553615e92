//! Points awarded for a correct answer.
use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::timer::Tenths;

/// Itemized points for one correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: u32,
    /// One point per tenth of a second left on the clock.
    pub time_bonus: u32,
    pub level_bonus: u32,
    pub streak_bonus: u32,
}

impl ScoreBreakdown {
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.base
            .saturating_add(self.time_bonus)
            .saturating_add(self.level_bonus)
            .saturating_add(self.streak_bonus)
    }
}

/// Bonus earned by a streak of `streak` answers: one bonus step per full `streak_step`.
#[must_use]
pub fn streak_bonus(streak: u32, cfg: &ScoringConfig) -> u32 {
    (streak / cfg.streak_step.max(1)).saturating_mul(cfg.streak_bonus_per_step)
}

/// Score a correct answer. `streak_before` excludes the answer being scored.
#[must_use]
pub fn score_correct_answer(
    level: u32,
    streak_before: u32,
    remaining: Tenths,
    cfg: &ScoringConfig,
) -> ScoreBreakdown {
    ScoreBreakdown {
        base: cfg.base_points,
        time_bonus: remaining,
        level_bonus: level.saturating_mul(cfg.level_bonus_per_level),
        streak_bonus: streak_bonus(streak_before, cfg),
    }
}

/// Milestone announced when `new_streak` lands on a multiple of the streak step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakMilestone {
    pub streak: u32,
    /// Bonus the streak now carries into the next answer.
    pub bonus: u32,
}

#[must_use]
pub fn streak_milestone(new_streak: u32, cfg: &ScoringConfig) -> Option<StreakMilestone> {
    let step = cfg.streak_step.max(1);
    (new_streak > 0 && new_streak % step == 0).then(|| StreakMilestone {
        streak: new_streak,
        bonus: streak_bonus(new_streak, cfg),
    })
}
