use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::rules::{Answer, Problem, RuleKind};
use crate::timer::{Countdown, Tenths};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// One miss ends the game.
    #[default]
    Standard,
    /// Misses cost a life; the game ends when lives run out.
    Infinite,
}

impl GameMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Infinite => "infinite",
        }
    }

    #[must_use]
    pub const fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "infinite" => Ok(Self::Infinite),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// No game has been started yet.
    #[default]
    Idle,
    Playing,
    GameOver,
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    WrongAnswer,
    TimeUp,
    PlayerQuit,
}

impl EndReason {
    /// Player-facing message shown on the game-over screen.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::WrongAnswer => "Wrong answer! Try again.",
            Self::TimeUp => "Time's up!",
            Self::PlayerQuit => "Game ended by player",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WrongAnswer => "wrong_answer",
            Self::TimeUp => "time_up",
            Self::PlayerQuit => "player_quit",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The problem currently on screen together with its clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Zero-based position within the game.
    pub index: u32,
    /// Level the challenge was generated for.
    pub level: u32,
    pub problem: Problem,
    pub countdown: Countdown,
}

/// How a challenge was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ChallengeOutcome {
    Correct { points: u32 },
    Wrong,
    TimedOut,
    /// The player ended the game while this challenge was open.
    Abandoned,
}

impl ChallengeOutcome {
    #[must_use]
    pub const fn is_correct(self) -> bool {
        matches!(self, Self::Correct { .. })
    }
}

/// Immutable ledger entry for a resolved challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub index: u32,
    pub level: u32,
    pub rule: RuleKind,
    pub number: i64,
    pub expected: Answer,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(flatten)]
    pub outcome: ChallengeOutcome,
    /// Time spent before the challenge resolved.
    pub tenths_used: Tenths,
}

impl ChallengeRecord {
    #[must_use]
    pub fn resolve(challenge: &Challenge, input: Option<&str>, outcome: ChallengeOutcome) -> Self {
        Self {
            index: challenge.index,
            level: challenge.level,
            rule: challenge.problem.rule,
            number: challenge.problem.number,
            expected: challenge.problem.expected,
            input: input.map(str::to_string),
            outcome,
            tenths_used: challenge.countdown.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_strings_roundtrip() {
        for mode in [GameMode::Standard, GameMode::Infinite] {
            assert_eq!(mode.as_str().parse::<GameMode>(), Ok(mode));
            assert_eq!(mode.to_string(), mode.as_str());
        }
        assert!("deep".parse::<GameMode>().is_err());
    }

    #[test]
    fn end_reasons_carry_messages() {
        assert_eq!(EndReason::TimeUp.message(), "Time's up!");
        assert_eq!(EndReason::WrongAnswer.message(), "Wrong answer! Try again.");
        assert_eq!(EndReason::PlayerQuit.message(), "Game ended by player");
        assert_eq!(EndReason::PlayerQuit.to_string(), "player_quit");
    }

    #[test]
    fn record_serializes_flat_outcome() {
        let record = ChallengeRecord {
            index: 0,
            level: 1,
            rule: RuleKind::Double,
            number: 7,
            expected: Answer::Number(14),
            input: Some("14".to_string()),
            outcome: ChallengeOutcome::Correct { points: 60 },
            tenths_used: 5,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["outcome"], "correct");
        assert_eq!(value["points"], 60);
        assert_eq!(value["rule"], "double");
        assert_eq!(value["expected"], 14);
    }
}
