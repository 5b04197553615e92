//! Interactive terminal game loop.
//!
//! A tokio interval drives the session clock while answers arrive
//! concurrently from any line-oriented async reader.
use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::time::{MissedTickBehavior, interval};

use number_challenge_game::{
    GameMode, GameSession, Miss, ResultSummary, SubmitOutcome, TickOutcome, share_code_for,
};

use crate::util::hearts;

/// Play games until the player declines a rematch or input ends.
pub async fn run_interactive<R, W>(
    session: &mut GameSession,
    mode: GameMode,
    input: R,
    out: &mut W,
) -> Result<Vec<ResultSummary>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut summaries = Vec::new();

    loop {
        let summary = play_game(session, mode, &mut lines, out).await?;
        render_summary(out, &summary)?;
        summaries.push(summary);

        write!(out, "Play again? [y/N] ")?;
        out.flush()?;
        let again = lines.next_line().await?;
        if !again.is_some_and(|line| line.trim().eq_ignore_ascii_case("y")) {
            break;
        }
    }

    Ok(summaries)
}

/// Play a single game to its end and return the summary.
pub async fn play_game<R, W>(
    session: &mut GameSession,
    mode: GameMode,
    lines: &mut Lines<R>,
    out: &mut W,
) -> Result<ResultSummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    session.start(mode);
    writeln!(
        out,
        "{} {}",
        "Seed:".dimmed(),
        seed_label(mode, session.seed()).bright_white()
    )?;
    render_challenge(out, session)?;

    let mut ticker = interval(session.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;
    let mut warned_low = false;

    while session.is_playing() {
        tokio::select! {
            _ = ticker.tick() => {
                match session.tick() {
                    TickOutcome::Running { .. } => {
                        let running_low = session
                            .challenge()
                            .is_some_and(|challenge| challenge.countdown.is_low());
                        if running_low && !warned_low {
                            warned_low = true;
                            if let Some(challenge) = session.challenge() {
                                writeln!(
                                    out,
                                    "{}",
                                    format!("⏳ {}s left", challenge.countdown.seconds_display()).red()
                                )?;
                            }
                        }
                    }
                    TickOutcome::Missed(miss) => {
                        writeln!(out, "{}", "⌛ Time's up!".red().bold())?;
                        warned_low = false;
                        render_miss(out, session, miss)?;
                    }
                    TickOutcome::Idle => {}
                }
            }
            line = lines.next_line() => {
                match line?.as_deref().map(str::trim) {
                    None | Some("" | "quit") => session.quit()?,
                    Some(answer) => {
                        warned_low = false;
                        ticker.reset();
                        match session.submit(answer)? {
                            SubmitOutcome::Correct { points, milestone } => {
                                writeln!(
                                    out,
                                    "{} +{} (base {} time {} level {} streak {})",
                                    "✅ Correct!".green().bold(),
                                    points.total(),
                                    points.base,
                                    points.time_bonus,
                                    points.level_bonus,
                                    points.streak_bonus
                                )?;
                                if let Some(milestone) = milestone {
                                    writeln!(
                                        out,
                                        "{}",
                                        format!("🔥 {} in a row! +{} per answer", milestone.streak, milestone.bonus)
                                            .bright_yellow()
                                    )?;
                                }
                                render_challenge(out, session)?;
                            }
                            SubmitOutcome::Missed(miss) => {
                                writeln!(out, "{}", "❌ Wrong answer!".red().bold())?;
                                render_miss(out, session, miss)?;
                            }
                        }
                    }
                }
            }
        }
        out.flush()?;
    }

    Ok(session.summary())
}

fn render_miss<W: Write>(out: &mut W, session: &GameSession, miss: Miss) -> Result<()> {
    if let Some(record) = session.ledger().last() {
        writeln!(out, "   The answer was {}", record.expected.to_string().bold())?;
    }
    match miss {
        Miss::LifeLost { lives_left } => {
            writeln!(out, "   {lives_left} lives left")?;
            render_challenge(out, session)?;
        }
        Miss::GameOver { .. } => {}
    }
    Ok(())
}

fn render_challenge<W: Write>(out: &mut W, session: &GameSession) -> Result<()> {
    let Some(challenge) = session.challenge() else {
        return Ok(());
    };
    let mut status = format!(
        "Level {} | Score {} | Streak {} | High {}",
        session.level(),
        session.score(),
        session.streak(),
        session.high_score()
    );
    if session.mode().is_infinite() {
        status.push_str(&format!(" | Lives {}", hearts(session.lives(), session.max_lives())));
    }
    writeln!(out)?;
    writeln!(out, "{}", status.dimmed())?;
    writeln!(out, "   {}", challenge.problem.number.to_string().bright_cyan().bold())?;
    writeln!(
        out,
        "   {} [{}s]",
        challenge.problem.description,
        challenge.countdown.seconds_display()
    )?;
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

pub fn render_summary<W: Write>(out: &mut W, summary: &ResultSummary) -> Result<()> {
    writeln!(out)?;
    let headline = if summary.new_high_score {
        summary.headline.bright_yellow().bold()
    } else {
        summary.headline.bright_red().bold()
    };
    writeln!(out, "{headline}")?;
    if !summary.message.is_empty() {
        writeln!(out, "{}", summary.message)?;
    }
    writeln!(out, "Score: {}", summary.score)?;
    writeln!(out, "Level reached: {}", summary.level_reached)?;
    writeln!(out, "Correct answers: {}", summary.correct_answers)?;
    writeln!(out, "Best streak: {}", summary.best_streak)?;
    writeln!(out, "High score: {}", summary.high_score)?;
    match &summary.seed_code {
        Some(code) => writeln!(out, "Share code: {code}")?,
        None => writeln!(out, "Seed: {}", summary.seed)?,
    }
    Ok(())
}

/// Share code when it replays this seed, otherwise the raw number.
fn seed_label(mode: GameMode, seed: u64) -> String {
    share_code_for(mode, seed).unwrap_or_else(|| seed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use number_challenge_game::{ChallengeConfig, Ending};
    use std::time::Duration;
    use tokio::io::BufReader;

    fn first_answer(seed: u64, mode: GameMode) -> String {
        let mut probe = GameSession::with_seed(seed);
        probe.start(mode);
        probe.challenge().unwrap().problem.expected.to_string()
    }

    #[test]
    fn correct_answer_then_quit() {
        let answer = first_answer(42, GameMode::Standard);
        let input = format!("{answer}\n\nn\n");
        let mut session = GameSession::with_seed(42);
        let mut out = Vec::new();

        let summaries = tokio_test::block_on(run_interactive(
            &mut session,
            GameMode::Standard,
            input.as_bytes(),
            &mut out,
        ))
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].ending, Ending::PlayerQuit);
        assert_eq!(summaries[0].correct_answers, 1);
        assert!(text.contains("Correct!"));
        assert!(text.contains("Game ended by player"));
        assert!(text.contains("New High Score!"));
        assert!(text.contains("Seed: 42"));
        assert!(!text.contains("Share code"));
    }

    #[test]
    fn seed_label_prefers_replayable_code() {
        assert_eq!(seed_label(GameMode::Standard, 42), "42");
        let (mode, seed) = number_challenge_game::decode_to_seed("ST-PRIME42").unwrap();
        assert_eq!(seed_label(mode, seed), "ST-PRIME42");
    }

    #[test]
    fn wrong_answer_and_rematch() {
        let input = "nope\ny\nquit\n";
        let mut session = GameSession::with_seed(8);
        let mut out = Vec::new();

        let summaries = tokio_test::block_on(run_interactive(
            &mut session,
            GameMode::Standard,
            input.as_bytes(),
            &mut out,
        ))
        .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].ending, Ending::WrongAnswer);
        assert_eq!(summaries[1].ending, Ending::PlayerQuit);
        assert_eq!(session.games_played(), 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Wrong answer!"));
        assert!(text.contains("The answer was"));
    }

    #[test]
    fn infinite_mode_shows_lives() {
        let input = "nope\nnope\nnope\n";
        let mut session = GameSession::with_seed(3);
        let mut out = Vec::new();
        let summaries = tokio_test::block_on(run_interactive(
            &mut session,
            GameMode::Infinite,
            input.as_bytes(),
            &mut out,
        ))
        .unwrap();
        assert_eq!(summaries[0].ending, Ending::WrongAnswer);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("2 lives left"));
        assert!(text.contains("1 lives left"));
    }

    #[test]
    fn idle_input_times_out() {
        let mut cfg = ChallengeConfig::default();
        cfg.timer.base_secs = 1;
        cfg.timer.min_secs = 1;
        cfg.timer.tick_millis = 1;
        let mut session = GameSession::new(5, cfg).unwrap();
        let reader = tokio_test::io::Builder::new()
            .wait(Duration::from_millis(500))
            .read(b"n\n")
            .build();
        let mut out = Vec::new();

        let summaries = tokio_test::block_on(run_interactive(
            &mut session,
            GameMode::Standard,
            BufReader::new(reader),
            &mut out,
        ))
        .unwrap();

        assert_eq!(summaries[0].ending, Ending::TimeUp);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Time's up!"));
    }
}
