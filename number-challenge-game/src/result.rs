//! End-of-game summary
use serde::{Deserialize, Serialize};

use crate::seed::share_code_for;
use crate::session::GameSession;
use crate::state::{EndReason, GameMode};

/// How the summarized game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    WrongAnswer,
    TimeUp,
    PlayerQuit,
    /// Summary taken before the game finished (or before one started).
    InProgress,
}

impl From<Option<EndReason>> for Ending {
    fn from(reason: Option<EndReason>) -> Self {
        match reason {
            Some(EndReason::WrongAnswer) => Self::WrongAnswer,
            Some(EndReason::TimeUp) => Self::TimeUp,
            Some(EndReason::PlayerQuit) => Self::PlayerQuit,
            None => Self::InProgress,
        }
    }
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ending::WrongAnswer => write!(f, "wrong_answer"),
            Ending::TimeUp => write!(f, "time_up"),
            Ending::PlayerQuit => write!(f, "player_quit"),
            Ending::InProgress => write!(f, "in_progress"),
        }
    }
}

/// Everything the game-over screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub ending: Ending,
    pub headline: String,
    pub message: String,
    pub mode: GameMode,
    pub seed: u64,
    /// Present only when the code replays this exact seed.
    pub seed_code: Option<String>,
    pub score: u64,
    pub level_reached: u32,
    pub correct_answers: usize,
    pub challenges: usize,
    pub best_streak: u32,
    pub lives_left: u8,
    pub high_score: u64,
    pub new_high_score: bool,
}

/// Generate the result summary for a session.
#[must_use]
pub fn result_summary(session: &GameSession) -> ResultSummary {
    let ending = Ending::from(session.end_reason());
    let headline = match ending {
        Ending::InProgress => "Game in progress",
        _ if session.new_high_score() => "New High Score!",
        _ => "Game Over!",
    };

    ResultSummary {
        ending,
        headline: headline.to_string(),
        message: session.message().to_string(),
        mode: session.mode(),
        seed: session.seed(),
        seed_code: share_code_for(session.mode(), session.seed()),
        score: session.score(),
        level_reached: session.level(),
        correct_answers: session.correct_answers(),
        challenges: session.ledger().len(),
        best_streak: session.best_streak(),
        lives_left: session.lives(),
        high_score: session.high_score(),
        new_high_score: session.new_high_score(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_summarizes_in_progress() {
        let session = GameSession::with_seed(42);
        let summary = result_summary(&session);
        assert_eq!(summary.ending, Ending::InProgress);
        assert_eq!(summary.headline, "Game in progress");
        assert_eq!(summary.score, 0);
        assert!(summary.message.is_empty());
        assert_eq!(summary.seed_code, None);
    }

    #[test]
    fn wrong_answer_summary() {
        let mut session = GameSession::with_seed(42);
        session.start(GameMode::Infinite);
        while session.is_playing() {
            session.submit("?").unwrap();
        }
        let summary = session.summary();
        assert_eq!(summary.ending, Ending::WrongAnswer);
        assert_eq!(summary.headline, "Game Over!");
        assert_eq!(summary.message, "Wrong answer! Try again.");
        assert_eq!(summary.challenges, 3);
        assert_eq!(summary.correct_answers, 0);
        assert_eq!(summary.lives_left, 0);
        assert_eq!(summary.seed_code, None);
    }

    #[test]
    fn high_score_headline() {
        let mut session = GameSession::with_seed(8);
        session.start(GameMode::Standard);
        let answer = session.challenge().unwrap().problem.expected.to_string();
        session.submit(&answer).unwrap();
        session.quit().unwrap();
        let summary = session.summary();
        assert_eq!(summary.headline, "New High Score!");
        assert_eq!(summary.level_reached, 2);
        assert_eq!(summary.ending.to_string(), "player_quit");
        assert_eq!(summary.high_score, summary.score);
    }

    #[test]
    fn share_code_replays_the_same_game() {
        let (mode, seed) = crate::seed::decode_to_seed("IN-ABACUS07").unwrap();
        let mut session = GameSession::with_seed(seed);
        session.start(mode);
        let first = session.challenge().unwrap().problem.clone();
        session.quit().unwrap();

        let code = session.summary().seed_code.unwrap();
        assert_eq!(code, "IN-ABACUS07");
        let (replay_mode, replay_seed) = crate::seed::decode_to_seed(&code).unwrap();
        let mut replay = GameSession::with_seed(replay_seed);
        replay.start(replay_mode);
        assert_eq!(replay.challenge().unwrap().problem, first);
    }
}
