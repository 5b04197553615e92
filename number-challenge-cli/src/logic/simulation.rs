use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use number_challenge_game::{
    ChallengeConfig, GameMode, GameSession, ResultSummary, SubmitOutcome, TickOutcome,
};

use crate::logic::policy::{AnswerPolicy, AnswerStrategy};
use crate::logic::seeds::SeedInfo;

/// Configuration for one simulated game.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub mode: GameMode,
    pub strategy: AnswerStrategy,
    pub max_challenges: u32,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(mode: GameMode, strategy: AnswerStrategy, seed: u64) -> Self {
        Self {
            seed,
            mode,
            strategy,
            max_challenges: 200,
        }
    }

    #[must_use]
    pub fn with_max_challenges(mut self, max_challenges: u32) -> Self {
        self.max_challenges = max_challenges;
        self
    }
}

/// Outcome of one simulated game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub strategy: String,
    pub mode: GameMode,
    pub seed: u64,
    /// Stopped by the challenge cap rather than a game over.
    pub capped: bool,
    pub milestones: u32,
    /// Game-clock time consumed, in tenths of a second.
    pub game_tenths: u64,
    pub result: ResultSummary,
    #[serde(with = "duration_serde")]
    pub wall_time: Duration,
}

/// Play one game with `policy` driving every answer.
pub fn run_simulation(
    config: SimulationConfig,
    tuning: &ChallengeConfig,
    policy: &mut dyn AnswerPolicy,
) -> anyhow::Result<SimulationSummary> {
    let started = Instant::now();
    let mut session = GameSession::new(config.seed, tuning.clone())?;
    session.start(config.mode);
    let mut milestones = 0_u32;

    while session.is_playing() && session.ledger().len() < cap(config.max_challenges) {
        let Some(challenge) = session.challenge().cloned() else {
            break;
        };
        let answer = policy.respond(&challenge);

        let mut expired = false;
        for _ in 0..answer.delay_ticks {
            if let TickOutcome::Missed(_) = session.tick() {
                expired = true;
                break;
            }
        }
        if expired {
            log::debug!("{} ran out of time on challenge {}", policy.name(), challenge.index);
            continue;
        }

        if let SubmitOutcome::Correct {
            milestone: Some(_), ..
        } = session.submit(&answer.input)?
        {
            milestones += 1;
        }
    }

    let capped = session.is_playing();
    let game_tenths = session
        .ledger()
        .iter()
        .map(|record| u64::from(record.tenths_used))
        .sum();

    Ok(SimulationSummary {
        strategy: config.strategy.key().to_string(),
        mode: config.mode,
        seed: config.seed,
        capped,
        milestones,
        game_tenths,
        result: session.summary(),
        wall_time: started.elapsed(),
    })
}

fn cap(max_challenges: u32) -> usize {
    usize::try_from(max_challenges).unwrap_or(usize::MAX)
}

/// Seed for the `iteration`-th game of a seed batch; iteration zero replays the seed itself.
#[must_use]
pub fn iteration_seed(seed: u64, iteration: usize) -> u64 {
    let step = u64::try_from(iteration).unwrap_or(u64::MAX);
    seed.wrapping_add(step.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Run every strategy over every seed, `iterations` games each.
///
/// Seeds taken from a share code play the mode the code names; plain seeds use `mode`.
pub fn run_batch(
    seeds: &[SeedInfo],
    strategies: &[AnswerStrategy],
    mode: GameMode,
    iterations: usize,
    max_challenges: u32,
    tuning: &ChallengeConfig,
) -> anyhow::Result<Vec<SimulationSummary>> {
    let mut runs = Vec::new();
    for &strategy in strategies {
        for info in seeds {
            let mode = info.source_mode.unwrap_or(mode);
            for iteration in 0..iterations {
                let game_seed = iteration_seed(info.seed, iteration);
                let mut policy = strategy.create_policy(game_seed);
                let config = SimulationConfig::new(mode, strategy, game_seed)
                    .with_max_challenges(max_challenges);
                runs.push(run_simulation(config, tuning, policy.as_mut())?);
            }
        }
    }
    Ok(runs)
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use number_challenge_game::Ending;

    fn simulate(strategy: AnswerStrategy, mode: GameMode, seed: u64, cap: u32) -> SimulationSummary {
        let mut policy = strategy.create_policy(seed);
        let config = SimulationConfig::new(mode, strategy, seed).with_max_challenges(cap);
        run_simulation(config, &ChallengeConfig::default(), policy.as_mut()).unwrap()
    }

    #[test]
    fn perfect_policy_hits_the_cap() {
        let run = simulate(AnswerStrategy::Perfect, GameMode::Standard, 42, 30);
        assert!(run.capped);
        assert_eq!(run.result.ending, Ending::InProgress);
        assert_eq!(run.result.correct_answers, 30);
        assert_eq!(run.result.level_reached, 31);
        assert_eq!(run.result.best_streak, 30);
        assert_eq!(run.milestones, 10);
        assert_eq!(run.game_tenths, 0);
    }

    #[test]
    fn timid_policy_eventually_times_out() {
        let run = simulate(AnswerStrategy::Timid, GameMode::Infinite, 7, 500);
        assert!(!run.capped);
        assert_eq!(run.result.ending, Ending::TimeUp);
        assert_eq!(run.result.lives_left, 0);
    }

    #[test]
    fn sloppy_policy_misses_in_standard_mode() {
        let run = simulate(AnswerStrategy::Sloppy, GameMode::Standard, 99, 1_000);
        assert_eq!(run.result.ending, Ending::WrongAnswer);
        assert!(run.game_tenths > 0);
    }

    #[test]
    fn simulations_are_reproducible() {
        let a = simulate(AnswerStrategy::Sloppy, GameMode::Infinite, 5, 200);
        let b = simulate(AnswerStrategy::Sloppy, GameMode::Infinite, 5, 200);
        assert_eq!(a.result, b.result);
        assert_eq!(a.game_tenths, b.game_tenths);
    }

    #[test]
    fn share_code_seeds_keep_their_mode() {
        let seeds = [crate::logic::resolve_seed("IN-PRIME42").unwrap()];
        let runs = run_batch(
            &seeds,
            &[AnswerStrategy::Perfect],
            GameMode::Standard,
            1,
            3,
            &ChallengeConfig::default(),
        )
        .unwrap();
        assert_eq!(runs[0].mode, GameMode::Infinite);
        assert_eq!(runs[0].result.seed_code.as_deref(), Some("IN-PRIME42"));
    }

    #[test]
    fn huge_iteration_count_without_policies_is_empty() {
        let runs = run_batch(
            &[SeedInfo::from_numeric(1), SeedInfo::from_numeric(2)],
            &[],
            GameMode::Standard,
            usize::MAX,
            5,
            &ChallengeConfig::default(),
        )
        .unwrap();
        assert!(runs.is_empty());
    }

    #[test]
    fn batch_covers_every_combination() {
        let runs = run_batch(
            &[SeedInfo::from_numeric(1), SeedInfo::from_numeric(2)],
            &[AnswerStrategy::Perfect, AnswerStrategy::Steady],
            GameMode::Standard,
            3,
            5,
            &ChallengeConfig::default(),
        )
        .unwrap();
        assert_eq!(runs.len(), 12);
        assert!(runs.iter().all(|run| run.mode == GameMode::Standard));
        assert_eq!(iteration_seed(9, 0), 9);
        assert_ne!(iteration_seed(9, 1), 9);
    }
}
