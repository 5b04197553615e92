use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use number_challenge_game::GameMode;
use number_challenge_game::numbers::mean_i64;

use super::SimulationSummary;

/// Per-strategy rollup across every simulated game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyAggregate {
    pub strategy: String,
    pub mode: GameMode,
    pub runs: usize,
    pub mean_score: f64,
    pub mean_level: f64,
    pub best_score: u64,
    pub best_streak: u32,
    pub capped_runs: usize,
    /// Run count per ending key.
    pub endings: BTreeMap<String, usize>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    aggregates: &'a [StrategyAggregate],
    runs: &'a [SimulationSummary],
}

/// Roll runs up by strategy, preserving first-seen order.
#[must_use]
pub fn aggregate_runs(runs: &[SimulationSummary]) -> Vec<StrategyAggregate> {
    let mut order: Vec<String> = Vec::new();
    for run in runs {
        if !order.contains(&run.strategy) {
            order.push(run.strategy.clone());
        }
    }

    order
        .into_iter()
        .filter_map(|strategy| {
            let group: Vec<&SimulationSummary> =
                runs.iter().filter(|run| run.strategy == strategy).collect();
            let first = group.first()?;
            let scores: Vec<i64> = group
                .iter()
                .map(|run| i64::try_from(run.result.score).unwrap_or(i64::MAX))
                .collect();
            let levels: Vec<i64> = group
                .iter()
                .map(|run| i64::from(run.result.level_reached))
                .collect();
            let mut endings = BTreeMap::new();
            for run in &group {
                *endings.entry(run.result.ending.to_string()).or_insert(0) += 1;
            }
            Some(StrategyAggregate {
                mode: first.mode,
                runs: group.len(),
                mean_score: mean_i64(&scores),
                mean_level: mean_i64(&levels),
                best_score: group.iter().map(|run| run.result.score).max().unwrap_or(0),
                best_streak: group
                    .iter()
                    .map(|run| run.result.best_streak)
                    .max()
                    .unwrap_or(0),
                capped_runs: group.iter().filter(|run| run.capped).count(),
                endings,
                strategy,
            })
        })
        .collect()
}

fn endings_label(endings: &BTreeMap<String, usize>) -> String {
    endings
        .iter()
        .map(|(key, count)| format!("{key}={count}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn generate_console_report(
    out: &mut dyn Write,
    aggregates: &[StrategyAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;

    for aggregate in aggregates {
        writeln!(
            out,
            "{} ({}, {} runs)",
            aggregate.strategy.bold(),
            aggregate.mode,
            aggregate.runs
        )?;
        writeln!(
            out,
            "   Mean score: {:.1}  best {}",
            aggregate.mean_score,
            aggregate.best_score.to_string().green()
        )?;
        writeln!(out, "   Mean level: {:.1}", aggregate.mean_level)?;
        writeln!(out, "   Best streak: {}", aggregate.best_streak)?;
        writeln!(out, "   Endings: {}", endings_label(&aggregate.endings))?;
        if aggregate.capped_runs > 0 {
            writeln!(
                out,
                "   {}",
                format!("{} run(s) hit the challenge cap", aggregate.capped_runs).yellow()
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Total time: {total_duration:?}")?;
    Ok(())
}

pub fn generate_json_report(
    out: &mut dyn Write,
    aggregates: &[StrategyAggregate],
    runs: &[SimulationSummary],
) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now().to_rfc3339(),
        aggregates,
        runs,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, aggregates: &[StrategyAggregate]) -> Result<()> {
    writeln!(out, "# Number Challenge Simulation Results\n")?;
    writeln!(out, "_Generated {}_\n", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;

    if aggregates.is_empty() {
        writeln!(out, "_No simulations executed._")?;
        return Ok(());
    }

    writeln!(out, "| Policy | Mode | Runs | Mean score | Mean level | Best streak | Endings |")?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for aggregate in aggregates {
        writeln!(
            out,
            "| {} | {} | {} | {:.1} | {:.1} | {} | {} |",
            aggregate.strategy,
            aggregate.mode,
            aggregate.runs,
            aggregate.mean_score,
            aggregate.mean_level,
            aggregate.best_streak,
            endings_label(&aggregate.endings)
        )?;
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, runs: &[SimulationSummary]) -> Result<()> {
    writeln!(
        out,
        "policy,mode,seed,seed_code,ending,score,level_reached,correct_answers,best_streak,game_tenths,capped"
    )?;
    for run in runs {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{}",
            run.strategy,
            run.mode,
            run.seed,
            run.result.seed_code.as_deref().unwrap_or(""),
            run.result.ending,
            run.result.score,
            run.result.level_reached,
            run.result.correct_answers,
            run.result.best_streak,
            run.game_tenths,
            run.capped
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{AnswerStrategy, SeedInfo, run_batch};
    use number_challenge_game::ChallengeConfig;

    fn sample_runs() -> Vec<SimulationSummary> {
        run_batch(
            &[SeedInfo::from_numeric(11)],
            &[AnswerStrategy::Perfect, AnswerStrategy::Sloppy],
            GameMode::Standard,
            2,
            12,
            &ChallengeConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn aggregates_group_by_strategy() {
        let runs = sample_runs();
        let aggregates = aggregate_runs(&runs);
        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].strategy, "perfect");
        assert_eq!(aggregates[0].runs, 2);
        assert_eq!(aggregates[0].capped_runs, 2);
        assert_eq!(aggregates[0].endings.get("in_progress"), Some(&2));
        assert!((aggregates[0].mean_level - 13.0).abs() < f64::EPSILON);
        assert_eq!(aggregates[1].endings.values().sum::<usize>(), 2);
    }

    #[test]
    fn csv_has_row_per_run() {
        let runs = sample_runs();
        let mut buf = Vec::new();
        generate_csv_report(&mut buf, &runs).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), runs.len() + 1);
        assert!(text.starts_with("policy,mode,seed"));
        assert!(text.contains("perfect,standard,"));
    }

    #[test]
    fn json_report_parses() {
        let runs = sample_runs();
        let aggregates = aggregate_runs(&runs);
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &aggregates, &runs).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["runs"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["aggregates"][0]["strategy"], "perfect");
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn markdown_handles_empty_input() {
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("_No simulations executed._"));
    }

    #[test]
    fn console_lists_each_strategy() {
        let aggregates = aggregate_runs(&sample_runs());
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &aggregates, Duration::from_millis(5)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("perfect"));
        assert!(text.contains("sloppy"));
        assert!(text.contains("Total time"));
    }
}
