//! Number Challenge Game Engine
//!
//! Platform-agnostic core logic for the Number Challenge arithmetic quiz.
//! Rule generation, the per-challenge countdown, scoring and lives live here;
//! the crate performs no I/O and owns no clock, so front ends drive it by
//! calling [`GameSession::tick`] on their own schedule.

pub mod arith;
pub mod config;
pub mod numbers;
pub mod result;
pub mod rng;
pub mod rules;
pub mod scoring;
pub mod seed;
pub mod session;
pub mod state;
pub mod timer;

// Re-export commonly used types
pub use config::{
    ChallengeConfig, ConfigError, DifficultyConfig, DifficultyTier, LivesConfig, ScoringConfig,
    TimerConfig,
};
pub use result::{Ending, ResultSummary, result_summary};
pub use rng::{CountingRng, RngBundle};
pub use rules::{
    Answer, MAX_DIFFICULTY, Operand, Problem, RuleKind, RulePool, eligible_rules, pick_rule,
};
pub use scoring::{ScoreBreakdown, StreakMilestone, score_correct_answer, streak_milestone};
pub use seed::{
    decode_to_seed, encode_friendly, generate_code_from_entropy, parse_share_code, share_code_for,
};
pub use session::{GameSession, Miss, SessionError, SubmitOutcome, TickOutcome};
pub use state::{Challenge, ChallengeOutcome, ChallengeRecord, EndReason, GameMode, GamePhase};
pub use timer::{Countdown, Tenths, TickState, time_limit_for_level};

/// Trait for abstracting where tuning comes from.
/// Front ends provide this for files, embedded assets or remote sources.
pub trait ConfigLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the challenge configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or parsed.
    fn load_config(&self) -> Result<ChallengeConfig, Self::Error>;
}

/// Loader that always yields the built-in tuning.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfigLoader;

impl ConfigLoader for DefaultConfigLoader {
    type Error = ConfigError;

    fn load_config(&self) -> Result<ChallengeConfig, Self::Error> {
        Ok(ChallengeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_loader_builds_idle_session() {
        let cfg = DefaultConfigLoader.load_config().unwrap();
        let session = GameSession::new(99, cfg).unwrap();
        assert_eq!(session.phase(), GamePhase::Idle);
        assert_eq!(session.seed(), 99);
        assert_eq!(session.config(), &ChallengeConfig::default());
    }
}
