//! Transition rules of the work/break cycle.
//!
//! These functions only touch [`AppState`] fields; saving and auto-start are
//! the engine's job.

use crate::state::{AppState, Settings, TimerState};
use crate::timer::Mode;

/// Mode that follows `finished`.
///
/// `pomodoros_completed` is the count *after* crediting the interval that
/// just finished.
pub fn next_mode(finished: Mode, pomodoros_completed: u32, long_break_every: u32) -> Mode {
    match finished {
        Mode::Pomodoro if pomodoros_completed % long_break_every.max(1) == 0 => Mode::LongBreak,
        Mode::Pomodoro => Mode::ShortBreak,
        Mode::ShortBreak | Mode::LongBreak => Mode::Pomodoro,
    }
}

/// Put the timer into `mode` with a full interval on the clock.
pub fn reset_to_mode(timer: &mut TimerState, settings: &Settings, mode: Mode) {
    timer.mode = mode;
    timer.remaining_seconds = settings.seconds_for(mode);
}

/// Stop the clock. Returns whether it was running.
pub fn halt(timer: &mut TimerState) -> bool {
    let was_running = timer.running;
    timer.running = false;
    timer.started_at_epoch_millis = None;
    was_running
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub finished: Mode,
    pub next: Mode,
    pub credited_task: Option<String>,
    pub task_graduated: bool,
}

/// Close out the current interval and move to the next one.
///
/// A finished pomodoro bumps the daily and cycle counters and credits the
/// current task; a finished break has no side effects besides the mode
/// change.
pub fn complete_interval(state: &mut AppState) -> Completion {
    let finished = state.timer.mode;
    let mut credited_task = None;
    let mut task_graduated = false;

    if finished == Mode::Pomodoro {
        state.done_today = state.done_today.saturating_add(1);
        state.timer.pomodoros_completed = state.timer.pomodoros_completed.saturating_add(1);
        state.timer.round = state.timer.round.saturating_add(1);

        if let Some(task) = state.current_task_mut() {
            credited_task = Some(task.id.clone());
            task_graduated = task.credit();
        }
        if task_graduated {
            state.current_task_id = None;
        }
    }

    let next = next_mode(
        finished,
        state.timer.pomodoros_completed,
        state.settings.long_break_every,
    );
    reset_to_mode(&mut state.timer, &state.settings, next);

    Completion {
        finished,
        next,
        credited_task,
        task_graduated,
    }
}
