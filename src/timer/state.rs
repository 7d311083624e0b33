//! Pomodoro countdown state machine.
//!
//! Pure state transitions driven by an external one-second clock. The caller
//! injects `now` into `start` and `tick`; the machine itself never reads the
//! wall clock, which keeps every transition deterministic under test.

use chrono::{DateTime, Utc};

/// Focus session length in whole seconds.
pub const FOCUS_SECS: u64 = 25 * 60;
/// Short break length in whole seconds.
pub const SHORT_BREAK_SECS: u64 = 5 * 60;
/// Long break length in whole seconds.
pub const LONG_BREAK_SECS: u64 = 15 * 60;

/// Every Nth completed focus session earns the long break.
const SESSIONS_PER_LONG_BREAK: u64 = 4;

/// Countdown mode, determining the duration loaded into the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    Idle,
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    /// Fixed duration table for each mode.
    pub fn duration_secs(self) -> u64 {
        match self {
            TimerMode::Idle => 0,
            TimerMode::Focus => FOCUS_SECS,
            TimerMode::ShortBreak => SHORT_BREAK_SECS,
            TimerMode::LongBreak => LONG_BREAK_SECS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimerMode::Idle => "IDLE",
            TimerMode::Focus => "FOCUS",
            TimerMode::ShortBreak => "SHORT_BREAK",
            TimerMode::LongBreak => "LONG_BREAK",
        }
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished focus session, emitted by `tick` exactly once per countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedFocus {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl CompletedFocus {
    /// Duration is the elapsed time rounded to whole minutes, never below 1.
    pub fn new(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> Self {
        let elapsed_ms = (ended_at - started_at).num_milliseconds().max(0);
        let duration_minutes = ((elapsed_ms as f64) / 60_000.0).round().max(1.0) as i64;
        Self {
            started_at,
            ended_at,
            duration_minutes,
        }
    }
}

/// Countdown state owned by a single cooperative task.
///
/// All mutation goes through `start` / `pause` / `reset` / `tick`, so no
/// locking is needed: there is exactly one logical timeline per timer.
#[derive(Debug, Clone)]
pub struct TimerState {
    mode: TimerMode,
    seconds_left: u64,
    is_running: bool,
    completed_focus_sessions: u64,
    /// Set while a focus run is in flight; retained across `pause`.
    session_start_time: Option<DateTime<Utc>>,
    /// Latch preventing the end-of-session transition from firing twice for
    /// one countdown. Reset when a new run starts.
    ended_this_run: bool,
}

impl TimerState {
    pub fn new() -> Self {
        Self {
            mode: TimerMode::Idle,
            seconds_left: 0,
            is_running: false,
            completed_focus_sessions: 0,
            session_start_time: None,
            ended_this_run: false,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn seconds_left(&self) -> u64 {
        self.seconds_left
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn completed_focus_sessions(&self) -> u64 {
        self.completed_focus_sessions
    }

    pub fn session_start_time(&self) -> Option<DateTime<Utc>> {
        self.session_start_time
    }

    /// Begin (or restart) a countdown.
    ///
    /// Uses `explicit` when given, otherwise the current mode, falling back
    /// to focus from idle. The countdown always reloads to the full mode
    /// duration. Restarting an in-flight focus run keeps its original start
    /// time so the recorded duration covers the whole session.
    pub fn start(&mut self, explicit: Option<TimerMode>, now: DateTime<Utc>) {
        let mode = explicit.unwrap_or(if self.mode == TimerMode::Idle {
            TimerMode::Focus
        } else {
            self.mode
        });

        let resuming_focus =
            mode == TimerMode::Focus && self.mode == TimerMode::Focus && self.session_start_time.is_some();

        self.mode = mode;
        self.seconds_left = mode.duration_secs();
        self.is_running = true;
        self.ended_this_run = false;

        if mode == TimerMode::Focus {
            if !resuming_focus {
                self.session_start_time = Some(now);
            }
        } else {
            self.session_start_time = None;
        }
    }

    /// Halt the clock without touching mode, remaining time, or the focus
    /// start time; a paused focus run can resume without losing its start.
    pub fn pause(&mut self) {
        self.is_running = false;
    }

    /// Back to idle. The displayed countdown deliberately shows the focus
    /// duration rather than zero, matching the app's historical behavior.
    pub fn reset(&mut self) {
        self.is_running = false;
        self.mode = TimerMode::Idle;
        self.seconds_left = TimerMode::Focus.duration_secs();
        self.session_start_time = None;
        self.ended_this_run = false;
    }

    /// Advance the countdown by one logical second.
    ///
    /// Returns a `CompletedFocus` when this tick ends a focus run that has a
    /// retained start time; break completions and idle ticks return `None`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<CompletedFocus> {
        if !self.is_running {
            return None;
        }

        if self.seconds_left <= 1 {
            self.seconds_left = 0;
            if self.ended_this_run {
                // A stale callback observed the final second after the
                // transition already ran; the latch keeps it inert.
                return None;
            }
            self.ended_this_run = true;
            return self.on_session_end(now);
        }

        self.seconds_left -= 1;
        None
    }

    fn on_session_end(&mut self, now: DateTime<Utc>) -> Option<CompletedFocus> {
        if self.mode == TimerMode::Focus {
            let report = self
                .session_start_time
                .take()
                .map(|started_at| CompletedFocus::new(started_at, now));

            self.completed_focus_sessions += 1;
            let next = if self.completed_focus_sessions % SESSIONS_PER_LONG_BREAK == 0 {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            };

            self.mode = next;
            self.seconds_left = next.duration_secs();
            self.is_running = false;
            report
        } else {
            // Break (or a zero-length idle run) ending: line up the next
            // focus session but wait for an explicit start before timing it.
            self.mode = TimerMode::Focus;
            self.seconds_left = TimerMode::Focus.duration_secs();
            self.is_running = false;
            None
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    /// Tick a running countdown to its end, returning the report (if any)
    /// and the wall-clock time of the final tick.
    fn run_to_completion(state: &mut TimerState, from: DateTime<Utc>) -> (Option<CompletedFocus>, DateTime<Utc>) {
        let mut now = from;
        for i in 1..=(FOCUS_SECS + LONG_BREAK_SECS) {
            now = from + Duration::seconds(i as i64);
            let report = state.tick(now);
            if !state.is_running() {
                return (report, now);
            }
        }
        panic!("countdown never completed");
    }

    #[test]
    fn start_from_idle_defaults_to_focus() {
        let mut state = TimerState::new();
        state.start(None, t0());

        assert_eq!(state.mode(), TimerMode::Focus);
        assert_eq!(state.seconds_left(), FOCUS_SECS);
        assert!(state.is_running());
        assert_eq!(state.session_start_time(), Some(t0()));
    }

    #[test]
    fn start_honors_explicit_mode() {
        let mut state = TimerState::new();
        state.start(Some(TimerMode::LongBreak), t0());

        assert_eq!(state.mode(), TimerMode::LongBreak);
        assert_eq!(state.seconds_left(), LONG_BREAK_SECS);
        assert_eq!(state.session_start_time(), None);
    }

    #[test]
    fn tick_is_noop_while_not_running() {
        let mut state = TimerState::new();
        assert_eq!(state.tick(t0()), None);
        assert_eq!(state.seconds_left(), 0);
        assert_eq!(state.mode(), TimerMode::Idle);
    }

    #[test]
    fn seconds_left_is_monotonic_and_never_negative() {
        let mut state = TimerState::new();
        state.start(None, t0());

        let mut prev = state.seconds_left();
        for i in 1..=FOCUS_SECS {
            state.tick(t0() + Duration::seconds(i as i64));
            if !state.is_running() {
                // Completion reloads the next mode's duration.
                break;
            }
            assert!(state.seconds_left() <= prev);
            prev = state.seconds_left();
        }
        assert_eq!(state.seconds_left(), SHORT_BREAK_SECS);
    }

    #[test]
    fn focus_completion_emits_report_and_stops() {
        let mut state = TimerState::new();
        state.start(None, t0());
        let (report, ended) = run_to_completion(&mut state, t0());

        let report = report.expect("focus completion should emit a report");
        assert_eq!(report.started_at, t0());
        assert_eq!(report.ended_at, ended);
        assert_eq!(report.duration_minutes, 25);

        assert_eq!(state.mode(), TimerMode::ShortBreak);
        assert_eq!(state.seconds_left(), SHORT_BREAK_SECS);
        assert!(!state.is_running());
        assert_eq!(state.session_start_time(), None);
        assert_eq!(state.completed_focus_sessions(), 1);
    }

    #[test]
    fn every_fourth_completion_selects_long_break() {
        let mut state = TimerState::new();
        let mut now = t0();
        let mut breaks = Vec::new();

        for _ in 0..4 {
            state.start(None, now);
            let (_, at) = run_to_completion(&mut state, now);
            breaks.push(state.mode());

            // Run the queued break so the next start() re-enters focus.
            state.start(None, at);
            let (_, at) = run_to_completion(&mut state, at);
            now = at;
        }

        assert_eq!(
            breaks,
            vec![
                TimerMode::ShortBreak,
                TimerMode::ShortBreak,
                TimerMode::ShortBreak,
                TimerMode::LongBreak,
            ]
        );
        assert_eq!(state.completed_focus_sessions(), 4);
    }

    #[test]
    fn break_completion_does_not_report_or_count() {
        let mut state = TimerState::new();
        state.start(Some(TimerMode::ShortBreak), t0());
        let (report, _) = run_to_completion(&mut state, t0());

        assert_eq!(report, None);
        assert_eq!(state.completed_focus_sessions(), 0);
        assert_eq!(state.mode(), TimerMode::Focus);
        assert_eq!(state.seconds_left(), FOCUS_SECS);
        assert!(!state.is_running());
    }

    #[test]
    fn stale_tick_after_completion_is_latched_out() {
        let mut state = TimerState::new();
        state.start(None, t0());
        let (report, ended) = run_to_completion(&mut state, t0());
        assert!(report.is_some());
        assert_eq!(state.completed_focus_sessions(), 1);

        // Simulate a stale ticker callback that raced the transition: it
        // still sees a running timer on the final second.
        state.is_running = true;
        state.seconds_left = 0;

        let dup = state.tick(ended + Duration::seconds(1));
        assert_eq!(dup, None);
        assert_eq!(state.seconds_left(), 0);
        assert_eq!(state.completed_focus_sessions(), 1);
    }

    #[test]
    fn duration_rounds_to_nearest_minute() {
        let report = CompletedFocus::new(t0(), t0() + Duration::seconds(90));
        assert_eq!(report.duration_minutes, 2);
    }

    #[test]
    fn duration_clamps_to_one_minute() {
        let report = CompletedFocus::new(t0(), t0() + Duration::seconds(10));
        assert_eq!(report.duration_minutes, 1);
    }

    #[test]
    fn pause_retains_progress_and_start_time() {
        let mut state = TimerState::new();
        state.start(None, t0());
        for i in 1..=10 {
            state.tick(t0() + Duration::seconds(i));
        }
        state.pause();

        assert!(!state.is_running());
        assert_eq!(state.mode(), TimerMode::Focus);
        assert_eq!(state.seconds_left(), FOCUS_SECS - 10);
        assert_eq!(state.session_start_time(), Some(t0()));
    }

    #[test]
    fn resuming_paused_focus_keeps_original_start_time() {
        let mut state = TimerState::new();
        state.start(None, t0());
        for i in 1..=10 {
            state.tick(t0() + Duration::seconds(i));
        }
        state.pause();

        let resumed_at = t0() + Duration::seconds(60);
        state.start(None, resumed_at);

        assert!(state.is_running());
        assert_eq!(state.session_start_time(), Some(t0()));
        // The countdown itself restarts from the full duration.
        assert_eq!(state.seconds_left(), FOCUS_SECS);
    }

    #[test]
    fn reset_returns_to_idle_with_focus_duration_displayed() {
        let mut state = TimerState::new();
        state.start(None, t0());
        for i in 1..=5 {
            state.tick(t0() + Duration::seconds(i));
        }
        state.reset();

        assert!(!state.is_running());
        assert_eq!(state.mode(), TimerMode::Idle);
        assert_eq!(state.seconds_left(), FOCUS_SECS);
        assert_eq!(state.session_start_time(), None);
    }

    #[test]
    fn counter_only_moves_on_focus_completions() {
        let mut state = TimerState::new();
        let mut now = t0();

        for round in 1..=3 {
            state.start(Some(TimerMode::Focus), now);
            let (_, at) = run_to_completion(&mut state, now);
            assert_eq!(state.completed_focus_sessions(), round);

            state.start(None, at);
            let (_, at) = run_to_completion(&mut state, at);
            assert_eq!(state.completed_focus_sessions(), round);
            now = at;
        }
    }
}
