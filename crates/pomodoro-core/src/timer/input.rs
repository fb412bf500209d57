//! Raw command input as a form delivers it.
//!
//! Numeric fields arrive as text. Settings fall back field by field to the
//! previous value when the text is not a finite number; a task with a bad
//! name or estimate is rejected outright.

use crate::error::ValidationError;
use crate::state::{Settings, MIN_INTERVAL_MINUTES, MIN_LONG_BREAK_EVERY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsInput {
    pub pomodoro_minutes: String,
    pub short_break_minutes: String,
    pub long_break_minutes: String,
    pub long_break_every: String,
    pub auto_start_next: bool,
}

impl From<&Settings> for SettingsInput {
    fn from(s: &Settings) -> Self {
        Self {
            pomodoro_minutes: s.pomodoro_minutes.to_string(),
            short_break_minutes: s.short_break_minutes.to_string(),
            long_break_minutes: s.long_break_minutes.to_string(),
            long_break_every: s.long_break_every.to_string(),
            auto_start_next: s.auto_start_next,
        }
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Floor to a whole number, then raise to `min`.
/// `None` when `raw` is not a finite number.
fn whole_at_least(raw: &str, min: u32) -> Option<u32> {
    // Float-to-int `as` saturates, so huge inputs land on u32::MAX.
    parse_finite(raw).map(|v| (v.floor() as u32).max(min))
}

impl SettingsInput {
    /// Build the replacement settings.
    ///
    /// Returns the new settings and the names of fields that kept their
    /// previous value.
    pub fn resolve(&self, previous: &Settings) -> (Settings, Vec<String>) {
        let mut fallbacks = Vec::new();
        let mut field = |name: &str, raw: &str, prev: u32, min: u32| {
            whole_at_least(raw, min).unwrap_or_else(|| {
                fallbacks.push(name.to_string());
                prev.max(min)
            })
        };

        let settings = Settings {
            pomodoro_minutes: field(
                "pomodoroMinutes",
                &self.pomodoro_minutes,
                previous.pomodoro_minutes,
                MIN_INTERVAL_MINUTES,
            ),
            short_break_minutes: field(
                "shortBreakMinutes",
                &self.short_break_minutes,
                previous.short_break_minutes,
                MIN_INTERVAL_MINUTES,
            ),
            long_break_minutes: field(
                "longBreakMinutes",
                &self.long_break_minutes,
                previous.long_break_minutes,
                MIN_INTERVAL_MINUTES,
            ),
            long_break_every: field(
                "longBreakEvery",
                &self.long_break_every,
                previous.long_break_every,
                MIN_LONG_BREAK_EVERY,
            ),
            auto_start_next: self.auto_start_next,
        };
        (settings, fallbacks)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub name: String,
    pub estimate: String,
}

impl TaskInput {
    pub fn new(name: impl Into<String>, estimate: u32) -> Self {
        Self {
            name: name.into(),
            estimate: estimate.to_string(),
        }
    }

    /// Trimmed name and estimate, or why they were rejected.
    ///
    /// # Errors
    /// `EmptyTaskName` for a blank name; `InvalidEstimate` unless the estimate
    /// is a finite whole number >= 1.
    pub fn validate(&self) -> Result<(String, u32), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyTaskName);
        }
        let estimate = parse_finite(&self.estimate)
            .filter(|v| v.fract() == 0.0 && *v >= 1.0 && *v <= f64::from(u32::MAX))
            .ok_or_else(|| ValidationError::InvalidEstimate(self.estimate.clone()))?;
        Ok((name.to_string(), estimate as u32))
    }
}
