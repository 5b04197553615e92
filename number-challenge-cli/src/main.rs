mod config_file;
mod logic;
mod play;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::BufReader;

use config_file::load_challenge_config;
use logic::{
    AnswerStrategy, SeedInfo, SimulationSummary, StrategyAggregate, aggregate_runs, resolve_seed,
    resolve_seed_inputs, run_batch,
};
use number_challenge_game::{ChallengeConfig, GameMode, GameSession};
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Play interactively in the terminal
    Play,
    /// Run automated policies and report the results
    Simulate,
}

#[derive(Debug, Parser)]
#[command(name = "number-challenge", version)]
#[command(about = "Arithmetic rules against the clock - play in the terminal or simulate policies")]
struct Args {
    /// Play interactively or simulate automated players
    #[arg(long, value_enum, default_value_t = RunMode::Play)]
    mode: RunMode,

    /// Infinite mode: misses cost a life instead of ending the game
    #[arg(long)]
    infinite: bool,

    /// Seeds as integers or share codes (comma-separated; play uses the first)
    #[arg(long)]
    seed: Option<String>,

    /// Policies to simulate (comma-separated)
    #[arg(long, default_value = "perfect,steady,sloppy,timid")]
    policies: String,

    /// Games per seed and policy (simulate mode only)
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Stop a simulated game after this many challenges
    #[arg(long, default_value_t = 200)]
    max_challenges: u32,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let tuning = load_challenge_config(args.config.as_deref())?;

    match args.mode {
        RunMode::Play => run_play(&args, tuning).await,
        RunMode::Simulate => run_simulate(&args, &tuning),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner(out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "{}", "🔢 Number Challenge".bright_cyan().bold())?;
    writeln!(out, "{}", "===================".cyan())
}

const fn requested_mode(args: &Args) -> GameMode {
    if args.infinite {
        GameMode::Infinite
    } else {
        GameMode::Standard
    }
}

/// Seed for interactive play; share codes carry their own mode.
fn play_seed(args: &Args) -> Result<(SeedInfo, GameMode)> {
    let requested = requested_mode(args);
    let info = match args.seed.as_deref().map(split_csv) {
        Some(tokens) if !tokens.is_empty() => resolve_seed(&tokens[0])?,
        _ => SeedInfo::from_entropy(requested, rand::random()),
    };
    let mode = match info.source_mode {
        Some(code_mode) if code_mode != requested && args.infinite => {
            log::warn!("--infinite ignored: share code selects {code_mode} mode");
            code_mode
        }
        Some(code_mode) => code_mode,
        None => requested,
    };
    Ok((info, mode))
}

async fn run_play(args: &Args, tuning: ChallengeConfig) -> Result<()> {
    let (seed_info, mode) = play_seed(args)?;
    let mut session = GameSession::new(seed_info.seed, tuning)?;

    let mut out = stdout();
    announce_banner(&mut out)?;
    writeln!(
        out,
        "Apply each rule to the number before the clock runs out. {}",
        "Enter an empty line or `quit` to stop.".dimmed()
    )?;

    let input = BufReader::new(tokio::io::stdin());
    let summaries = play::run_interactive(&mut session, mode, input, &mut out).await?;

    writeln!(
        out,
        "Thanks for playing! {} game(s), high score {}",
        summaries.len(),
        session.high_score()
    )?;
    out.flush()?;
    Ok(())
}

fn parse_policies(raw: &str) -> Result<Vec<AnswerStrategy>> {
    let mut strategies = Vec::new();
    for token in split_csv(raw) {
        let strategy = token
            .parse::<AnswerStrategy>()
            .map_err(anyhow::Error::msg)?;
        if !strategies.contains(&strategy) {
            strategies.push(strategy);
        }
    }
    if strategies.is_empty() {
        bail!("no policies selected");
    }
    Ok(strategies)
}

fn run_simulate(args: &Args, tuning: &ChallengeConfig) -> Result<()> {
    let start_time = Instant::now();
    let strategies = parse_policies(&args.policies)?;
    let seed_tokens = split_csv(args.seed.as_deref().unwrap_or("1337"));
    let seeds = resolve_seed_inputs(&seed_tokens)?;

    if args.report == "console" || args.output.is_some() {
        announce_banner(&mut stdout())?;
    }

    let runs = run_batch(
        &seeds,
        &strategies,
        requested_mode(args),
        args.iterations,
        args.max_challenges,
        tuning,
    )?;

    if args.verbose {
        for run in &runs {
            eprintln!(
                "🧪 {} {} seed {} -> {} score {} level {}",
                run.strategy.bright_white(),
                run.mode,
                run.seed,
                run.result.ending,
                run.result.score,
                run.result.level_reached
            );
        }
    }

    let aggregates = aggregate_runs(&runs);
    write_reports(args, &runs, &aggregates, start_time)
}

fn write_reports(
    args: &Args,
    runs: &[SimulationSummary],
    aggregates: &[StrategyAggregate],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, aggregates, runs)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, aggregates)?,
        "csv" => logic::reports::generate_csv_report(&mut output_target, runs)?,
        _ => {
            if runs.is_empty() {
                writeln!(&mut output_target, "No simulations executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    aggregates,
                    start_time.elapsed(),
                )?;
            }
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
