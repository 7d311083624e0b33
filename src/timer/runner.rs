//! Interactive countdown loop for the terminal timer.
//!
//! A single cooperative task owns the `TimerState`: one `select!` loop
//! multiplexes the one-second ticker, stdin commands, and the shutdown
//! signal, so no other timeline can mutate the countdown.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval_at, Instant, Interval};
use tracing::{info, warn};

use crate::client::SessionClient;
use crate::utils::shutdown_signal;

use super::state::{TimerMode, TimerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start(Option<TimerMode>),
    Pause,
    Reset,
    Status,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let command = words.next()?.to_ascii_lowercase();

    match command.as_str() {
        "start" | "s" => {
            let mode = match words.next().map(|w| w.to_ascii_lowercase()) {
                None => None,
                Some(word) => match word.as_str() {
                    "focus" => Some(TimerMode::Focus),
                    "short" | "short-break" => Some(TimerMode::ShortBreak),
                    "long" | "long-break" => Some(TimerMode::LongBreak),
                    _ => return None,
                },
            };
            Some(Command::Start(mode))
        }
        "pause" | "p" => Some(Command::Pause),
        "reset" | "r" => Some(Command::Reset),
        "status" => Some(Command::Status),
        "quit" | "q" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

pub(crate) fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn new_ticker() -> Interval {
    let period = Duration::from_secs(1);
    interval_at(Instant::now() + period, period)
}

fn print_status(state: &TimerState) {
    println!(
        "Mode: {}  Remaining: {}  Completed focus sessions: {}",
        state.mode(),
        format_clock(state.seconds_left()),
        state.completed_focus_sessions()
    );
}

enum LoopEvent {
    Tick,
    Line(std::io::Result<Option<String>>),
    Shutdown,
}

/// Run the timer until the user quits or a shutdown signal arrives.
pub async fn run(client: SessionClient) -> Result<()> {
    info!("Starting interactive timer");

    let mut state = TimerState::new();
    let mut ticker = new_ticker();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    println!("focusbrew timer -- commands: start [focus|short|long], pause, reset, status, quit");
    print_status(&state);

    loop {
        let event = tokio::select! {
            _ = ticker.tick() => LoopEvent::Tick,
            line = lines.next_line() => LoopEvent::Line(line),
            _ = &mut shutdown => LoopEvent::Shutdown,
        };

        match event {
            LoopEvent::Tick => {
                let was_running = state.is_running();
                let finished_mode = state.mode();

                if let Some(report) = state.tick(Utc::now()) {
                    println!(
                        "\nFocus session complete ({} min). Up next: {}",
                        report.duration_minutes,
                        state.mode()
                    );
                    // Fire-and-forget: the recorder's outcome is only
                    // logged and the timer moves on regardless.
                    client.spawn_submit(report);
                    print_status(&state);
                } else if was_running && !state.is_running() {
                    println!("\n{} finished. Up next: {}", finished_mode, state.mode());
                    print_status(&state);
                } else if state.is_running() {
                    print!(
                        "\r{:<12} {}  ",
                        state.mode().as_str(),
                        format_clock(state.seconds_left())
                    );
                    let _ = std::io::stdout().flush();
                }
            }

            LoopEvent::Line(Ok(Some(line))) => {
                let Some(command) = parse_command(&line) else {
                    if !line.trim().is_empty() {
                        println!("Unrecognized command: {}", line.trim());
                    }
                    continue;
                };

                match command {
                    Command::Start(mode) => {
                        state.start(mode, Utc::now());
                        // Replace the ticker so the new countdown gets a
                        // fresh cadence and the old one never overlaps it.
                        ticker = new_ticker();
                        println!(
                            "Started {} ({})",
                            state.mode(),
                            format_clock(state.seconds_left())
                        );
                    }
                    Command::Pause => {
                        state.pause();
                        println!("\nPaused at {}", format_clock(state.seconds_left()));
                    }
                    Command::Reset => {
                        state.reset();
                        println!("Timer reset");
                        print_status(&state);
                    }
                    Command::Status => print_status(&state),
                    Command::Quit => break,
                }
            }

            LoopEvent::Line(Ok(None)) => {
                info!("stdin closed, stopping timer");
                break;
            }

            LoopEvent::Line(Err(err)) => {
                warn!("Failed to read command: {}", err);
                break;
            }

            LoopEvent::Shutdown => {
                println!();
                break;
            }
        }
    }

    info!(
        "Timer stopped after {} completed focus sessions",
        state.completed_focus_sessions()
    );
    Ok(())
}
