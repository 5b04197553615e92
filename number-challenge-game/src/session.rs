use std::time::Duration;

use thiserror::Error;

use crate::config::{ChallengeConfig, ConfigError};
use crate::result::{ResultSummary, result_summary};
use crate::rng::RngBundle;
use crate::rules::pick_rule;
use crate::scoring::{ScoreBreakdown, StreakMilestone, score_correct_answer, streak_milestone};
use crate::state::{
    Challenge, ChallengeOutcome, ChallengeRecord, EndReason, GameMode, GamePhase,
};
use crate::timer::{Countdown, Tenths, TickState};

/// Errors raised by session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no game in progress (phase {phase:?})")]
    NotPlaying { phase: GamePhase },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Consequence of a wrong answer or an expired clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    /// A life was spent and a fresh challenge is already on screen.
    LifeLost { lives_left: u8 },
    GameOver { reason: EndReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Correct {
        points: ScoreBreakdown,
        milestone: Option<StreakMilestone>,
    },
    Missed(Miss),
}

impl SubmitOutcome {
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        matches!(self, Self::Missed(Miss::GameOver { .. }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No game in progress; the tick was ignored.
    Idle,
    Running { remaining: Tenths },
    Missed(Miss),
}

impl TickOutcome {
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        matches!(self, Self::Missed(Miss::GameOver { .. }))
    }
}

/// Single-player game state machine: challenge generation, countdown, scoring and lives.
///
/// The session owns no clock. Callers drive it with [`GameSession::tick`] once per
/// [`GameSession::tick_interval`] and feed answers through [`GameSession::submit`].
#[derive(Debug, Clone)]
pub struct GameSession {
    cfg: ChallengeConfig,
    rng: RngBundle,
    phase: GamePhase,
    mode: GameMode,
    level: u32,
    score: u64,
    streak: u32,
    best_streak: u32,
    lives: u8,
    challenge: Option<Challenge>,
    challenges_issued: u32,
    high_score: u64,
    new_high_score: bool,
    end_reason: Option<EndReason>,
    games_played: u32,
    ledger: Vec<ChallengeRecord>,
}

impl GameSession {
    /// Construct an idle session.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration violates an invariant.
    pub fn new(seed: u64, cfg: ChallengeConfig) -> Result<Self, SessionError> {
        cfg.validate()?;
        Ok(Self::idle(seed, cfg))
    }

    /// Idle session with the default tuning.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::idle(seed, ChallengeConfig::default())
    }

    fn idle(seed: u64, cfg: ChallengeConfig) -> Self {
        Self {
            cfg,
            rng: RngBundle::from_user_seed(seed),
            phase: GamePhase::Idle,
            mode: GameMode::Standard,
            level: 1,
            score: 0,
            streak: 0,
            best_streak: 0,
            lives: 0,
            challenge: None,
            challenges_issued: 0,
            high_score: 0,
            new_high_score: false,
            end_reason: None,
            games_played: 0,
            ledger: Vec::new(),
        }
    }

    /// Begin a new game, abandoning any game in progress. The high score carries over.
    pub fn start(&mut self, mode: GameMode) {
        self.mode = mode;
        self.phase = GamePhase::Playing;
        self.level = 1;
        self.score = 0;
        self.streak = 0;
        self.best_streak = 0;
        self.lives = self.lives_for(mode);
        self.challenges_issued = 0;
        self.new_high_score = false;
        self.end_reason = None;
        self.ledger.clear();
        self.games_played = self.games_played.saturating_add(1);
        log::info!(
            "game start | mode {mode} seed {} lives {}",
            self.rng.seed(),
            self.lives
        );
        self.next_challenge();
    }

    /// Check `input` against the challenge on screen.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotPlaying`] when no game is in progress.
    pub fn submit(&mut self, input: &str) -> Result<SubmitOutcome, SessionError> {
        let challenge = self.take_open_challenge()?;

        if !challenge.problem.is_correct(input) {
            let miss = self.miss(
                &challenge,
                Some(input),
                ChallengeOutcome::Wrong,
                EndReason::WrongAnswer,
            );
            return Ok(SubmitOutcome::Missed(miss));
        }

        let points = score_correct_answer(
            self.level,
            self.streak,
            challenge.countdown.remaining(),
            &self.cfg.scoring,
        );
        self.score = self.score.saturating_add(u64::from(points.total()));
        self.streak = self.streak.saturating_add(1);
        self.best_streak = self.best_streak.max(self.streak);
        let milestone = streak_milestone(self.streak, &self.cfg.scoring);
        self.ledger.push(ChallengeRecord::resolve(
            &challenge,
            Some(input),
            ChallengeOutcome::Correct {
                points: points.total(),
            },
        ));
        self.level = self.level.saturating_add(1);
        self.next_challenge();
        Ok(SubmitOutcome::Correct { points, milestone })
    }

    /// Advance the clock of the open challenge by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != GamePhase::Playing {
            return TickOutcome::Idle;
        }
        let Some(challenge) = self.challenge.as_mut() else {
            return TickOutcome::Idle;
        };
        match challenge.countdown.tick() {
            TickState::Running => TickOutcome::Running {
                remaining: challenge.countdown.remaining(),
            },
            TickState::Expired => {
                let Some(expired) = self.challenge.take() else {
                    return TickOutcome::Idle;
                };
                log::debug!(
                    "time up | challenge {} level {}",
                    expired.index,
                    expired.level
                );
                let miss = self.miss(&expired, None, ChallengeOutcome::TimedOut, EndReason::TimeUp);
                TickOutcome::Missed(miss)
            }
        }
    }

    /// End the game in progress for `reason`, regardless of lives left.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotPlaying`] when no game is in progress.
    pub fn end(&mut self, reason: EndReason) -> Result<(), SessionError> {
        let challenge = self.take_open_challenge()?;
        let outcome = match reason {
            EndReason::WrongAnswer => ChallengeOutcome::Wrong,
            EndReason::TimeUp => ChallengeOutcome::TimedOut,
            EndReason::PlayerQuit => ChallengeOutcome::Abandoned,
        };
        self.ledger
            .push(ChallengeRecord::resolve(&challenge, None, outcome));
        self.finish(reason);
        Ok(())
    }

    /// End the game in progress at the player's request.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotPlaying`] when no game is in progress.
    pub fn quit(&mut self) -> Result<(), SessionError> {
        self.end(EndReason::PlayerQuit)
    }

    /// Deterministically reseed future challenges.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = RngBundle::from_user_seed(seed);
    }

    fn take_open_challenge(&mut self) -> Result<Challenge, SessionError> {
        if self.phase != GamePhase::Playing {
            return Err(SessionError::NotPlaying { phase: self.phase });
        }
        self.challenge
            .take()
            .ok_or(SessionError::NotPlaying { phase: self.phase })
    }

    fn miss(
        &mut self,
        challenge: &Challenge,
        input: Option<&str>,
        outcome: ChallengeOutcome,
        reason: EndReason,
    ) -> Miss {
        self.ledger
            .push(ChallengeRecord::resolve(challenge, input, outcome));
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.finish(reason);
            return Miss::GameOver { reason };
        }
        self.streak = 0;
        self.next_challenge();
        Miss::LifeLost {
            lives_left: self.lives,
        }
    }

    fn finish(&mut self, reason: EndReason) {
        self.phase = GamePhase::GameOver;
        self.challenge = None;
        self.end_reason = Some(reason);
        if self.score > self.high_score {
            self.high_score = self.score;
            self.new_high_score = true;
        }
        log::info!(
            "game over | {reason} score {} level {} high {}",
            self.score,
            self.level,
            self.high_score
        );
    }

    fn next_challenge(&mut self) {
        let rule = pick_rule(self.level, &self.cfg.difficulty, self.rng.rules());
        let problem = rule.generate(self.rng.operands());
        let countdown = Countdown::for_level(self.level, &self.cfg.timer);
        self.challenge = Some(Challenge {
            index: self.challenges_issued,
            level: self.level,
            problem,
            countdown,
        });
        self.challenges_issued = self.challenges_issued.saturating_add(1);
    }

    const fn lives_for(&self, mode: GameMode) -> u8 {
        match mode {
            GameMode::Standard => self.cfg.lives.standard,
            GameMode::Infinite => self.cfg.lives.infinite,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ChallengeConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub const fn rng(&self) -> &RngBundle {
        &self.rng
    }

    /// Wall-clock spacing between calls to [`GameSession::tick`].
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.cfg.timer.tick_millis)
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub const fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub const fn lives(&self) -> u8 {
        self.lives
    }

    /// Lives the current mode started with.
    #[must_use]
    pub const fn max_lives(&self) -> u8 {
        self.lives_for(self.mode)
    }

    #[must_use]
    pub const fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    #[must_use]
    pub const fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Whether the last finished game raised the high score.
    #[must_use]
    pub const fn new_high_score(&self) -> bool {
        self.new_high_score
    }

    #[must_use]
    pub const fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Game-over message, empty while no game has ended.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.end_reason.map_or("", EndReason::message)
    }

    #[must_use]
    pub const fn games_played(&self) -> u32 {
        self.games_played
    }

    #[must_use]
    pub fn ledger(&self) -> &[ChallengeRecord] {
        &self.ledger
    }

    #[must_use]
    pub fn correct_answers(&self) -> usize {
        self.ledger
            .iter()
            .filter(|record| record.outcome.is_correct())
            .count()
    }

    #[must_use]
    pub fn summary(&self) -> ResultSummary {
        result_summary(self)
    }
}
