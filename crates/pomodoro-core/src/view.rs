//! Read-only values derived from [`AppState`] for rendering.

use serde::Serialize;

use crate::state::{AppState, Task};
use crate::timer::Mode;

/// Fixed daily target of completed work intervals.
pub const DAILY_GOAL: u32 = 12;

/// `MM:SS`, each part zero-padded to at least two digits.
pub fn format_remaining(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Share of the daily goal reached, capped at 100.
pub fn daily_goal_percent(done_today: u32) -> f64 {
    (f64::from(done_today) / f64::from(DAILY_GOAL) * 100.0).min(100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: String,
    pub name: String,
    pub estimate: u32,
    pub done: u32,
    pub progress: f64,
    pub is_current: bool,
}

impl TaskView {
    fn new(task: &Task, current_id: Option<&str>) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            estimate: task.estimate,
            done: task.done,
            progress: task.progress(),
            is_current: current_id == Some(task.id.as_str()),
        }
    }
}

/// Everything the view layer renders, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub mode: Mode,
    pub mode_label: &'static str,
    pub remaining_seconds: u64,
    pub remaining: String,
    pub running: bool,
    pub round: u32,
    pub pomodoros_completed: u32,
    pub done_today: u32,
    pub daily_goal_percent: f64,
    pub current_task: Option<TaskView>,
    pub tasks: Vec<TaskView>,
}

impl Snapshot {
    pub fn of(state: &AppState) -> Self {
        let current = state.current_task();
        let current_id = current.map(|t| t.id.as_str());
        Self {
            mode: state.timer.mode,
            mode_label: state.timer.mode.label(),
            remaining_seconds: state.timer.remaining_seconds,
            remaining: format_remaining(state.timer.remaining_seconds),
            running: state.timer.running,
            round: state.timer.round,
            pomodoros_completed: state.timer.pomodoros_completed,
            done_today: state.done_today,
            daily_goal_percent: daily_goal_percent(state.done_today),
            current_task: current.map(|t| TaskView::new(t, current_id)),
            tasks: state
                .tasks
                .iter()
                .map(|t| TaskView::new(t, current_id))
                .collect(),
        }
    }
}
