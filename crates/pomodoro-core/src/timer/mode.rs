use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The three interval kinds the cycle moves between.
///
/// There is no idle state: whether the clock is counting is the orthogonal
/// `running` flag on [`TimerState`](crate::state::TimerState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl Mode {
    /// Tab order.
    pub const ALL: [Mode; 3] = [Mode::Pomodoro, Mode::ShortBreak, Mode::LongBreak];

    /// Display label for the view layer.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Pomodoro => "Focus",
            Mode::ShortBreak => "Short break",
            Mode::LongBreak => "Long break",
        }
    }

    /// Name as it appears in the persisted record.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Pomodoro => "pomodoro",
            Mode::ShortBreak => "shortBreak",
            Mode::LongBreak => "longBreak",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pomodoro" | "work" | "focus" => Ok(Mode::Pomodoro),
            "shortBreak" | "short-break" | "short" => Ok(Mode::ShortBreak),
            "longBreak" | "long-break" | "long" => Ok(Mode::LongBreak),
            other => Err(ValidationError::UnknownMode(other.to_string())),
        }
    }
}
