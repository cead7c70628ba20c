use anyhow::Result;
use std::io::{self, Write};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::{MissedTickBehavior, interval};

use pour_core::feedback::{Feedback, FeedbackSink};
use pour_core::locale::Dictionary;
use pour_core::models::{DRAIN_INSTRUCTIONS, DRAIN_STAGE_NAME, Recipe, format_clock};
use pour_core::service::RecipeBook;
use pour_core::timer::{StageTimer, TimerEvent};

use super::helpers::resolve_recipe;
use super::recipe::print_recipe_detail;

const BAR_WIDTH: usize = 20;

/// Rings the terminal bell. Terminals have no vibration motor, so vibration
/// requests are only logged.
pub(crate) struct TerminalSink;

impl FeedbackSink for TerminalSink {
    fn play_sound(&self) -> Result<()> {
        let mut err = io::stderr();
        err.write_all(b"\x07")?;
        err.flush()?;
        Ok(())
    }

    fn vibrate(&self, pattern_ms: u64) -> Result<()> {
        tracing::debug!("vibration not supported in a terminal, ignoring {pattern_ms}ms pattern");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Toggle,
    Skip,
    Reset,
    Quit,
}

/// Enter or `p` starts/pauses, `s` skips the stage, `r` resets, `q` quits.
fn parse_control(line: &str) -> Option<Control> {
    match line.trim().to_lowercase().as_str() {
        "" | "p" | "pause" | "start" => Some(Control::Toggle),
        "s" | "skip" => Some(Control::Skip),
        "r" | "reset" => Some(Control::Reset),
        "q" | "quit" | "exit" => Some(Control::Quit),
        _ => None,
    }
}

struct BrewSession<'d, S: FeedbackSink> {
    timer: StageTimer,
    feedback: Feedback<S>,
    dict: &'d Dictionary,
}

impl<'d, S: FeedbackSink> BrewSession<'d, S> {
    fn new(recipe: &Recipe, feedback: Feedback<S>, dict: &'d Dictionary) -> Self {
        BrewSession {
            timer: StageTimer::new(recipe),
            feedback,
            dict,
        }
    }

    /// Apply a control. Returns false when the session should end.
    fn control(&mut self, control: Control) -> bool {
        match control {
            Control::Toggle => {
                if !self.timer.pause() && !self.timer.start() {
                    println!("\nNothing left to brew. Press r to reset or q to quit.");
                }
            }
            Control::Skip => {
                if self.timer.can_skip() {
                    if let Some(event) = self.timer.skip() {
                        self.announce(event);
                    } else {
                        self.print_stage();
                    }
                }
            }
            Control::Reset => {
                self.timer.reset();
                self.print_stage();
            }
            Control::Quit => return false,
        }
        true
    }

    fn tick(&mut self) {
        if let Some(event) = self.timer.tick() {
            self.announce(event);
        }
    }

    fn announce(&self, event: TimerEvent) {
        self.feedback.signal();
        match event {
            TimerEvent::StageComplete { index } => {
                tracing::debug!("stage {index} complete");
                self.print_stage();
            }
            TimerEvent::BrewComplete => {
                println!("\n{} Brew complete. Enjoy!", format_clock(0));
            }
        }
    }

    fn stage_text(&self) -> (&str, &str) {
        let stage = self.timer.current_stage();
        if stage.is_drain {
            (
                self.dict.label("detail.drain", DRAIN_STAGE_NAME),
                self.dict.label("detail.drainInstruction", DRAIN_INSTRUCTIONS),
            )
        } else {
            (stage.name, stage.instructions)
        }
    }

    fn print_stage(&self) {
        let (name, instructions) = self.stage_text();
        let label = self.dict.label("detail.currStage", "Current Stage");
        println!("\n{label}: {name}\n  {instructions}");
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn status_line(&self) -> String {
        let percent = self.timer.progress_percent();
        let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
        let bar = format!(
            "{}{}",
            "#".repeat(filled.min(BAR_WIDTH)),
            "-".repeat(BAR_WIDTH - filled.min(BAR_WIDTH))
        );
        let (name, _) = self.stage_text();
        let state = if self.timer.is_running() {
            ""
        } else if self.timer.is_finished() {
            " (done)"
        } else {
            " (paused)"
        };
        format!(
            "[{bar}] {percent:>3.0}%  {}  {name} {}{state}",
            format_clock(self.timer.remaining()),
            format_clock(self.timer.stage_remaining()),
        )
    }

    fn render(&self) {
        print!("\r\x1b[2K{}", self.status_line());
        if let Err(e) = io::stdout().flush() {
            tracing::debug!("failed to flush status line: {e}");
        }
    }
}

/// Drive the timer from a one-second ticker and line commands on `input`.
/// Ends when the brew completes, on `q`, or when input closes.
async fn run_session<S, R>(session: &mut BrewSession<'_, S>, input: R) -> Result<()>
where
    S: FeedbackSink,
    R: AsyncBufRead + Unpin,
{
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    let mut lines = input.lines();
    session.print_stage();
    session.render();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !session.timer.is_running() {
                    continue;
                }
                session.tick();
                session.render();
                if session.timer.is_finished() {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("input closed, ending brew");
                    break;
                };
                let Some(control) = parse_control(&line) else {
                    eprintln!("Unknown command '{}'. Use p, s, r or q", line.trim());
                    continue;
                };
                let was_running = session.timer.is_running();
                if !session.control(control) {
                    break;
                }
                // A fresh second after resuming.
                if !was_running && session.timer.is_running() {
                    ticker.reset();
                }
                session.render();
                if control == Control::Skip && session.timer.is_finished() {
                    break;
                }
            }
        }
    }
    println!();
    Ok(())
}

pub(crate) async fn cmd_brew(
    book: &RecipeBook,
    dict: &Dictionary,
    key: &str,
    paused: bool,
) -> Result<()> {
    let recipe = resolve_recipe(book, dict, key, false)?;
    let prefs = book.preferences()?;
    print_recipe_detail(recipe, dict);

    let mut session = BrewSession::new(recipe, Feedback::new(TerminalSink, &prefs), dict);
    if session.timer.total() == 0 {
        println!("{}", dict.label("detail.noStage", "No active stage."));
        return Ok(());
    }
    if !paused {
        session.timer.start();
    }
    println!("\nEnter: start/pause   s: skip stage   r: reset   q: quit");

    run_session(&mut session, BufReader::new(tokio::io::stdin())).await
}
