use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::Settings;
use crate::timer::Mode;

/// Every state change produced by a command yields an Event.
/// The driver prints or renders them; a no-op command yields none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    /// An interval ended, by running out or by a manual skip.
    CycleCompleted {
        finished: Mode,
        next: Mode,
        skipped: bool,
        pomodoros_completed: u32,
        round: u32,
        done_today: u32,
        /// Task credited with the finished pomodoro, if any.
        credited_task: Option<String>,
        /// The credited task reached its estimate and lost current status.
        task_graduated: bool,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: Mode,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        settings: Settings,
        /// Fields whose input was not a number and kept the previous value.
        fallbacks: Vec<String>,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TaskAdded {
        task_id: String,
        name: String,
        estimate: u32,
        became_current: bool,
        at: DateTime<Utc>,
    },
    TaskSelected {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        task_id: String,
        was_current: bool,
        at: DateTime<Utc>,
    },
    StateReset {
        at: DateTime<Utc>,
    },
}
