//! Tuning knobs for scoring, the countdown, the difficulty gate and lives.
//!
//! Every field carries a serde default so partial JSON documents only need to
//! name the values they override.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::MAX_DIFFICULTY;

/// Aggregate configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChallengeConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub difficulty: DifficultyConfig,
    #[serde(default)]
    pub lives: LivesConfig,
}

impl ChallengeConfig {
    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or violates a configuration invariant.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scoring.streak_step == 0 {
            return Err(ConfigError::ZeroField {
                field: "scoring.streak_step",
            });
        }
        if self.timer.tick_millis == 0 {
            return Err(ConfigError::ZeroField {
                field: "timer.tick_millis",
            });
        }
        if self.timer.levels_per_second == 0 {
            return Err(ConfigError::ZeroField {
                field: "timer.levels_per_second",
            });
        }
        if self.timer.min_secs == 0 {
            return Err(ConfigError::ZeroField {
                field: "timer.min_secs",
            });
        }
        if self.timer.min_secs > self.timer.base_secs {
            return Err(ConfigError::TimerBounds {
                min: self.timer.min_secs,
                base: self.timer.base_secs,
            });
        }
        if self.lives.standard == 0 || self.lives.infinite == 0 {
            return Err(ConfigError::ZeroField { field: "lives" });
        }
        self.difficulty.validate()
    }
}

/// Points formula constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "ScoringConfig::default_base_points")]
    pub base_points: u32,
    #[serde(default = "ScoringConfig::default_level_bonus_per_level")]
    pub level_bonus_per_level: u32,
    #[serde(default = "ScoringConfig::default_streak_step")]
    pub streak_step: u32,
    #[serde(default = "ScoringConfig::default_streak_bonus_per_step")]
    pub streak_bonus_per_step: u32,
}

impl ScoringConfig {
    const fn default_base_points() -> u32 {
        10
    }

    const fn default_level_bonus_per_level() -> u32 {
        5
    }

    const fn default_streak_step() -> u32 {
        3
    }

    const fn default_streak_bonus_per_step() -> u32 {
        10
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_points: Self::default_base_points(),
            level_bonus_per_level: Self::default_level_bonus_per_level(),
            streak_step: Self::default_streak_step(),
            streak_bonus_per_step: Self::default_streak_bonus_per_step(),
        }
    }
}

/// Countdown constants. Limits are whole seconds; ticks are `tick_millis` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "TimerConfig::default_base_secs")]
    pub base_secs: u32,
    #[serde(default = "TimerConfig::default_min_secs")]
    pub min_secs: u32,
    #[serde(default = "TimerConfig::default_levels_per_second")]
    pub levels_per_second: u32,
    #[serde(default = "TimerConfig::default_tick_millis")]
    pub tick_millis: u64,
}

impl TimerConfig {
    const fn default_base_secs() -> u32 {
        5
    }

    const fn default_min_secs() -> u32 {
        2
    }

    const fn default_levels_per_second() -> u32 {
        5
    }

    const fn default_tick_millis() -> u64 {
        100
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            base_secs: Self::default_base_secs(),
            min_secs: Self::default_min_secs(),
            levels_per_second: Self::default_levels_per_second(),
            tick_millis: Self::default_tick_millis(),
        }
    }
}

/// One step of the difficulty gate: levels up to `max_level` admit rules up to `max_difficulty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyTier {
    pub max_level: u32,
    pub max_difficulty: u8,
}

/// Ordered difficulty gate. Levels past the last tier admit every rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    #[serde(default = "DifficultyConfig::default_tiers")]
    pub tiers: Vec<DifficultyTier>,
}

impl DifficultyConfig {
    fn default_tiers() -> Vec<DifficultyTier> {
        vec![
            DifficultyTier {
                max_level: 3,
                max_difficulty: 2,
            },
            DifficultyTier {
                max_level: 6,
                max_difficulty: 3,
            },
            DifficultyTier {
                max_level: 10,
                max_difficulty: 4,
            },
        ]
    }

    /// Highest rule difficulty admitted at `level`.
    #[must_use]
    pub fn max_difficulty_for_level(&self, level: u32) -> u8 {
        self.tiers
            .iter()
            .find(|tier| level <= tier.max_level)
            .map_or(MAX_DIFFICULTY, |tier| tier.max_difficulty)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for pair in self.tiers.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.max_level <= prev.max_level {
                return Err(ConfigError::TierOrder {
                    prev: prev.max_level,
                    next: next.max_level,
                });
            }
        }
        if let Some(tier) = self.tiers.iter().find(|tier| tier.max_difficulty == 0) {
            return Err(ConfigError::TierDifficulty {
                max_level: tier.max_level,
            });
        }
        Ok(())
    }
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            tiers: Self::default_tiers(),
        }
    }
}

/// Lives granted per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivesConfig {
    #[serde(default = "LivesConfig::default_standard")]
    pub standard: u8,
    #[serde(default = "LivesConfig::default_infinite")]
    pub infinite: u8,
}

impl LivesConfig {
    const fn default_standard() -> u8 {
        1
    }

    const fn default_infinite() -> u8 {
        3
    }
}

impl Default for LivesConfig {
    fn default() -> Self {
        Self {
            standard: Self::default_standard(),
            infinite: Self::default_infinite(),
        }
    }
}

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config is not valid JSON: {message}")]
    Parse { message: String },
    #[error("{field} must be greater than zero")]
    ZeroField { field: &'static str },
    #[error("timer minimum {min}s exceeds base {base}s")]
    TimerBounds { min: u32, base: u32 },
    #[error("difficulty tiers must have increasing levels (got {prev} then {next})")]
    TierOrder { prev: u32, next: u32 },
    #[error("difficulty tier ending at level {max_level} admits no rules")]
    TierDifficulty { max_level: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = ChallengeConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.scoring.base_points, 10);
        assert_eq!(cfg.timer.tick_millis, 100);
        assert_eq!(cfg.lives.infinite, 3);
    }

    #[test]
    fn difficulty_gate_follows_tiers() {
        let gate = DifficultyConfig::default();
        assert_eq!(gate.max_difficulty_for_level(1), 2);
        assert_eq!(gate.max_difficulty_for_level(3), 2);
        assert_eq!(gate.max_difficulty_for_level(4), 3);
        assert_eq!(gate.max_difficulty_for_level(6), 3);
        assert_eq!(gate.max_difficulty_for_level(7), 4);
        assert_eq!(gate.max_difficulty_for_level(10), 4);
        assert_eq!(gate.max_difficulty_for_level(11), MAX_DIFFICULTY);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ChallengeConfig::from_json(r#"{ "timer": { "base_secs": 8 } }"#).unwrap();
        assert_eq!(cfg.timer.base_secs, 8);
        assert_eq!(cfg.timer.min_secs, 2);
        assert_eq!(cfg.scoring, ScoringConfig::default());
        assert_eq!(cfg.difficulty, DifficultyConfig::default());
    }

    #[test]
    fn rejects_invalid_documents() {
        assert!(matches!(
            ChallengeConfig::from_json("not json"),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(
            ChallengeConfig::from_json(r#"{ "scoring": { "streak_step": 0 } }"#),
            Err(ConfigError::ZeroField {
                field: "scoring.streak_step"
            })
        );
        assert_eq!(
            ChallengeConfig::from_json(r#"{ "timer": { "base_secs": 1, "min_secs": 2 } }"#),
            Err(ConfigError::TimerBounds { min: 2, base: 1 })
        );
        let unordered = r#"{ "difficulty": { "tiers": [
            { "max_level": 5, "max_difficulty": 2 },
            { "max_level": 5, "max_difficulty": 3 }
        ] } }"#;
        assert_eq!(
            ChallengeConfig::from_json(unordered),
            Err(ConfigError::TierOrder { prev: 5, next: 5 })
        );
    }
}
