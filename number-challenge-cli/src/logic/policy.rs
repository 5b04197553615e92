use std::fmt;
use std::str::FromStr;

use number_challenge_game::{Answer, Challenge};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// What an automated player does with a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyAnswer {
    /// Clock ticks spent thinking before answering.
    pub delay_ticks: u32,
    pub input: String,
}

impl PolicyAnswer {
    #[must_use]
    pub fn new(delay_ticks: u32, input: impl Into<String>) -> Self {
        Self {
            delay_ticks,
            input: input.into(),
        }
    }
}

/// Policy interface for automated play.
pub trait AnswerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    fn respond(&mut self, challenge: &Challenge) -> PolicyAnswer;
}

/// Built-in answering strategies for simulated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnswerStrategy {
    /// Always right, instantly.
    Perfect,
    /// Always right, using two fifths of the clock.
    Steady,
    /// Quick but careless.
    Sloppy,
    /// Always right but slow enough to run out of time.
    Timid,
}

impl AnswerStrategy {
    pub const ALL: [Self; 4] = [Self::Perfect, Self::Steady, Self::Sloppy, Self::Timid];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Steady => "steady",
            Self::Sloppy => "sloppy",
            Self::Timid => "timid",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect",
            Self::Steady => "Steady",
            Self::Sloppy => "Sloppy",
            Self::Timid => "Timid",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn AnswerPolicy + Send> {
        match self {
            Self::Perfect => Box::new(PerfectPolicy),
            Self::Steady => Box::new(SteadyPolicy),
            Self::Sloppy => Box::new(SloppyPolicy::new(seed)),
            Self::Timid => Box::new(TimidPolicy::new(seed)),
        }
    }
}

impl fmt::Display for AnswerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnswerStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown policy: {s}"))
    }
}

/// A plausible but incorrect response.
fn wrong_answer(expected: &Answer) -> String {
    match expected {
        Answer::Number(n) => n.wrapping_add(1).to_string(),
        Answer::YesNo(b) => Answer::YesNo(!b).to_string(),
    }
}

struct PerfectPolicy;
struct SteadyPolicy;

struct SloppyPolicy {
    rng: ChaCha20Rng,
    error_rate: f64,
}

impl SloppyPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            error_rate: 0.12,
        }
    }
}

struct TimidPolicy {
    rng: ChaCha20Rng,
}

impl TimidPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl AnswerPolicy for PerfectPolicy {
    fn name(&self) -> &'static str {
        "Perfect"
    }

    fn respond(&mut self, challenge: &Challenge) -> PolicyAnswer {
        PolicyAnswer::new(0, challenge.problem.expected.to_string())
    }
}

impl AnswerPolicy for SteadyPolicy {
    fn name(&self) -> &'static str {
        "Steady"
    }

    fn respond(&mut self, challenge: &Challenge) -> PolicyAnswer {
        let delay = challenge.countdown.limit() * 2 / 5;
        PolicyAnswer::new(delay, challenge.problem.expected.to_string())
    }
}

impl AnswerPolicy for SloppyPolicy {
    fn name(&self) -> &'static str {
        "Sloppy"
    }

    fn respond(&mut self, challenge: &Challenge) -> PolicyAnswer {
        let delay = self.rng.gen_range(0..=challenge.countdown.limit() / 2);
        let expected = &challenge.problem.expected;
        let input = if self.rng.gen_bool(self.error_rate) {
            wrong_answer(expected)
        } else {
            expected.to_string()
        };
        PolicyAnswer::new(delay, input)
    }
}

impl AnswerPolicy for TimidPolicy {
    fn name(&self) -> &'static str {
        "Timid"
    }

    fn respond(&mut self, challenge: &Challenge) -> PolicyAnswer {
        let limit = challenge.countdown.limit();
        let delay = self.rng.gen_range(limit / 2..=limit + limit / 4);
        PolicyAnswer::new(delay, challenge.problem.expected.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use number_challenge_game::{GameMode, GameSession};

    fn first_challenge(seed: u64) -> Challenge {
        let mut session = GameSession::with_seed(seed);
        session.start(GameMode::Standard);
        session.challenge().cloned().unwrap()
    }

    #[test]
    fn strategies_parse_by_key() {
        for strategy in AnswerStrategy::ALL {
            assert_eq!(strategy.key().parse::<AnswerStrategy>(), Ok(strategy));
        }
        assert_eq!(" Timid ".parse::<AnswerStrategy>(), Ok(AnswerStrategy::Timid));
        assert!("reckless".parse::<AnswerStrategy>().is_err());
    }

    #[test]
    fn perfect_and_steady_answer_correctly() {
        let challenge = first_challenge(4);
        let mut perfect = AnswerStrategy::Perfect.create_policy(1);
        let answer = perfect.respond(&challenge);
        assert_eq!(answer.delay_ticks, 0);
        assert!(challenge.problem.is_correct(&answer.input));

        let mut steady = AnswerStrategy::Steady.create_policy(1);
        let answer = steady.respond(&challenge);
        assert_eq!(answer.delay_ticks, 20);
        assert!(challenge.problem.is_correct(&answer.input));
        assert_eq!(steady.name(), "Steady");
    }

    #[test]
    fn wrong_answers_never_match() {
        assert_eq!(wrong_answer(&Answer::Number(41)), "42");
        assert_eq!(wrong_answer(&Answer::YesNo(true)), "no");
        assert!(!Answer::Number(i64::MAX).matches(&wrong_answer(&Answer::Number(i64::MAX))));
    }

    #[test]
    fn noisy_policies_are_seeded() {
        let challenge = first_challenge(9);
        for strategy in [AnswerStrategy::Sloppy, AnswerStrategy::Timid] {
            let mut a = strategy.create_policy(77);
            let mut b = strategy.create_policy(77);
            for _ in 0..20 {
                assert_eq!(a.respond(&challenge), b.respond(&challenge));
            }
        }
    }

    #[test]
    fn timid_delay_spans_past_the_limit() {
        let challenge = first_challenge(9);
        let limit = challenge.countdown.limit();
        let mut timid = AnswerStrategy::Timid.create_policy(3);
        let delays: Vec<u32> = (0..200).map(|_| timid.respond(&challenge).delay_ticks).collect();
        assert!(delays.iter().all(|d| *d >= limit / 2 && *d <= limit + limit / 4));
        assert!(delays.iter().any(|d| *d >= limit));
    }
}
