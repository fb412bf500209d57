//! # Pomodoro Core Library
//!
//! Core logic for a Pomodoro timer: alternating focused work intervals with
//! short and periodic long breaks, tracking per-task progress and a daily
//! count of finished work intervals. The CLI (and any other front end) is a
//! thin driver over this crate.
//!
//! ## Architecture
//!
//! - **Cycle engine**: a state machine over work / short break / long break.
//!   It owns no scheduler; the host calls `advance_one_second()` once per
//!   second while the timer runs.
//! - **State store**: the single persisted [`AppState`], loaded once per
//!   process (with day-rollover normalization) and written through after
//!   every mutating command.
//! - **Storage slots**: SQLite, JSON-file and in-memory backends for the one
//!   durable record.
//!
//! ## Key Components
//!
//! - [`CycleEngine`]: commands (start, pause, skip, switch mode, settings,
//!   tasks, reset)
//! - [`StateStore`]: load/save and rollover
//! - [`Snapshot`]: read-only values for rendering
//! - [`Config`]: driver configuration (storage backend, log filter)

pub mod clock;
pub mod error;
pub mod events;
pub mod state;
pub mod storage;
pub mod timer;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, PersistenceError, ValidationError};
pub use events::Event;
pub use state::{AppState, Settings, Task, TimerState, SCHEMA_VERSION};
pub use storage::{
    Backend, Config, JsonFileSlot, LoadReport, LoadSource, MemorySlot, SqliteSlot, StateSlot,
    StateStore,
};
pub use timer::{CycleEngine, Mode, Outcome, SettingsInput, TaskInput};
pub use view::{daily_goal_percent, format_remaining, Snapshot, TaskView, DAILY_GOAL};
