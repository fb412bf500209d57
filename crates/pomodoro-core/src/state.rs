//! Persisted application state.
//!
//! [`AppState`] is the single unit of persistence: it is rewritten in full
//! after every mutating command. The JSON layout is camelCase and tolerant of
//! older records, which may lack `schemaVersion` or use the field names of the
//! first browser build (`pomodoroMin`, `remainingSec`, `est`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::Mode;

/// Version stamped on every record this build writes.
pub const SCHEMA_VERSION: u32 = 1;

pub const MIN_INTERVAL_MINUTES: u32 = 1;
pub const MIN_LONG_BREAK_EVERY: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(
        default = "default_pomodoro_minutes",
        alias = "pomodoroMin",
        deserialize_with = "whole::as_u32"
    )]
    pub pomodoro_minutes: u32,
    #[serde(
        default = "default_short_break_minutes",
        alias = "shortMin",
        deserialize_with = "whole::as_u32"
    )]
    pub short_break_minutes: u32,
    #[serde(
        default = "default_long_break_minutes",
        alias = "longMin",
        deserialize_with = "whole::as_u32"
    )]
    pub long_break_minutes: u32,
    /// Work intervals between long breaks.
    #[serde(
        default = "default_long_break_every",
        alias = "longEvery",
        deserialize_with = "whole::as_u32"
    )]
    pub long_break_every: u32,
    #[serde(default)]
    pub auto_start_next: bool,
}

fn default_pomodoro_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_long_break_every() -> u32 {
    4
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro_minutes: default_pomodoro_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_every: default_long_break_every(),
            auto_start_next: false,
        }
    }
}

impl Settings {
    pub fn minutes_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Pomodoro => self.pomodoro_minutes,
            Mode::ShortBreak => self.short_break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        }
    }

    pub fn seconds_for(&self, mode: Mode) -> u64 {
        u64::from(self.minutes_for(mode)).saturating_mul(60)
    }

    /// Raise every numeric field to its minimum.
    pub fn clamp_minimums(&mut self) {
        self.pomodoro_minutes = self.pomodoro_minutes.max(MIN_INTERVAL_MINUTES);
        self.short_break_minutes = self.short_break_minutes.max(MIN_INTERVAL_MINUTES);
        self.long_break_minutes = self.long_break_minutes.max(MIN_INTERVAL_MINUTES);
        self.long_break_every = self.long_break_every.max(MIN_LONG_BREAK_EVERY);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    #[serde(default)]
    pub mode: Mode,
    #[serde(
        default = "default_remaining_seconds",
        alias = "remainingSec",
        deserialize_with = "whole::as_u64"
    )]
    pub remaining_seconds: u64,
    #[serde(default)]
    pub running: bool,
    /// Informational only; remaining time is decremented by ticks.
    #[serde(default, alias = "startedAt")]
    pub started_at_epoch_millis: Option<i64>,
    /// Finished work intervals since midnight.
    #[serde(default, alias = "pomodorosDone")]
    pub pomodoros_completed: u32,
    #[serde(default = "default_round")]
    pub round: u32,
}

fn default_remaining_seconds() -> u64 {
    Settings::default().seconds_for(Mode::Pomodoro)
}
fn default_round() -> u32 {
    1
}

impl TimerState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            mode: Mode::Pomodoro,
            remaining_seconds: settings.seconds_for(Mode::Pomodoro),
            running: false,
            started_at_epoch_millis: None,
            pomodoros_completed: 0,
            round: 1,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Target number of pomodoros.
    #[serde(alias = "est", deserialize_with = "whole::as_u32")]
    pub estimate: u32,
    #[serde(default, deserialize_with = "whole::as_u32")]
    pub done: u32,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
}

impl Task {
    pub fn new(name: impl Into<String>, estimate: u32, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            estimate,
            done: 0,
            created_at,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.done >= self.estimate
    }

    /// `done / estimate` in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.estimate == 0 {
            return 0.0;
        }
        (f64::from(self.done) / f64::from(self.estimate)).min(1.0)
    }

    /// Credit one finished pomodoro, capped at the estimate.
    /// Returns true when the task has just reached its estimate.
    pub fn credit(&mut self) -> bool {
        self.done = self.done.saturating_add(1).min(self.estimate);
        self.is_complete()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Absent in records written before versioning; read as 0.
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub timer: TimerState,
    /// Newest first.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Weak reference into `tasks`; may dangle.
    #[serde(default)]
    pub current_task_id: Option<String>,
    /// Local calendar date, used only for rollover detection.
    #[serde(default = "missing_date")]
    pub today: NaiveDate,
    #[serde(default)]
    pub done_today: u32,
}

fn missing_date() -> NaiveDate {
    NaiveDate::MIN
}

impl AppState {
    /// Default state for a first run on `today`.
    pub fn fresh(today: NaiveDate) -> Self {
        let settings = Settings::default();
        Self {
            schema_version: SCHEMA_VERSION,
            timer: TimerState::new(&settings),
            settings,
            tasks: Vec::new(),
            current_task_id: None,
            today,
            done_today: 0,
        }
    }

    /// Resolve `current_task_id`; a dangling id reads as no current task.
    pub fn current_task(&self) -> Option<&Task> {
        let id = self.current_task_id.as_deref()?;
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn current_task_mut(&mut self) -> Option<&mut Task> {
        let id = self.current_task_id.as_deref()?;
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Reset the daily counters when `today` has moved on.
    /// Returns true if a rollover happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.today == today {
            return false;
        }
        self.today = today;
        self.done_today = 0;
        self.timer.pomodoros_completed = 0;
        self.timer.round = 1;
        true
    }

    /// Re-establish invariants on a record read from storage.
    pub fn normalize(&mut self) {
        self.settings.clamp_minimums();
        self.timer.round = self.timer.round.max(1);
        if self.timer.remaining_seconds == 0 {
            self.timer.remaining_seconds = self.settings.seconds_for(self.timer.mode);
        }
        if !self.timer.running {
            self.timer.started_at_epoch_millis = None;
        }
        for task in &mut self.tasks {
            task.estimate = task.estimate.max(1);
            task.done = task.done.min(task.estimate);
        }
        if self.current_task().is_some_and(Task::is_complete) {
            self.current_task_id = None;
        }
        self.schema_version = SCHEMA_VERSION;
    }
}

/// Lenient readers for counters and durations.
///
/// Records written by the browser build may hold fractional numbers such as
/// `"pomodoroMin": 2.5`. Those are floored; negatives read as 0 and values
/// beyond the target type saturate.
mod whole {
    use std::fmt;

    use serde::de::{self, Deserializer, Visitor};

    struct WholeNumber;

    impl<'de> Visitor<'de> for WholeNumber {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a finite number")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            Ok(u64::try_from(v).unwrap_or(0))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<u64, E> {
            if !v.is_finite() {
                return Err(E::invalid_value(de::Unexpected::Float(v), &self));
            }
            // Float-to-int `as` saturates at both ends.
            Ok(v.floor() as u64)
        }
    }

    pub fn as_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        deserializer.deserialize_any(WholeNumber)
    }

    pub fn as_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let v = deserializer.deserialize_any(WholeNumber)?;
        Ok(u32::try_from(v).unwrap_or(u32::MAX))
    }
}
