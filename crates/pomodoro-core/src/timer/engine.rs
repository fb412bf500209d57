//! Cycle engine: the commands the view layer invokes.
//!
//! The engine owns the [`StateStore`] and a [`Clock`]. It has no scheduler:
//! the host calls [`CycleEngine::advance_one_second`] once per second while
//! the timer runs. Every command runs to completion, writes the state through
//! and reports what happened as an [`Outcome`].
//!
//! ## Transitions
//!
//! ```text
//! Pomodoro --finish--> ShortBreak | LongBreak (every Nth pomodoro)
//! ShortBreak | LongBreak --finish--> Pomodoro
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CycleEngine::load(slot, SystemClock);
//! engine.start();
//! // once per second:
//! engine.advance_one_second();
//! ```

use tracing::{debug, info, warn};

use super::cycle::{self, Completion};
use super::input::{SettingsInput, TaskInput};
use super::Mode;
use crate::clock::{Clock, SystemClock};
use crate::error::{PersistenceError, ValidationError};
use crate::events::Event;
use crate::state::{AppState, Task};
use crate::storage::{StateSlot, StateStore};
use crate::view::Snapshot;

/// Result of one command.
///
/// `events` is empty when the command was a no-op. `warnings` holds every
/// save that failed while the command ran; the in-memory state is still
/// authoritative.
#[derive(Debug, Default)]
pub struct Outcome {
    pub events: Vec<Event>,
    pub warnings: Vec<PersistenceError>,
}

impl Outcome {
    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
    }

    fn merge(&mut self, other: Outcome) {
        self.events.extend(other.events);
        self.warnings.extend(other.warnings);
    }
}

pub struct CycleEngine<S, C = SystemClock> {
    store: StateStore<S>,
    clock: C,
}

impl<S: StateSlot, C: Clock> CycleEngine<S, C> {
    pub fn new(store: StateStore<S>, clock: C) -> Self {
        Self { store, clock }
    }

    /// Load state from `slot` for the clock's current date.
    pub fn load(slot: S, clock: C) -> Self {
        let store = StateStore::load(slot, clock.today());
        Self::new(store, clock)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn store(&self) -> &StateStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StateStore<S> {
        &mut self.store
    }

    pub fn into_store(self) -> StateStore<S> {
        self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start(&mut self) -> Outcome {
        let mut out = Outcome::default();
        let now = self.clock.now();
        let timer = &mut self.store.state_mut().timer;
        if timer.running {
            return out;
        }
        timer.running = true;
        timer.started_at_epoch_millis = Some(now.timestamp_millis());
        debug!(mode = %timer.mode, remaining = timer.remaining_seconds, "timer started");
        out.events.push(Event::TimerStarted {
            mode: timer.mode,
            remaining_seconds: timer.remaining_seconds,
            at: now,
        });
        self.save(&mut out);
        out
    }

    pub fn pause(&mut self) -> Outcome {
        let mut out = Outcome::default();
        let timer = &mut self.store.state_mut().timer;
        if !cycle::halt(timer) {
            return out;
        }
        debug!(mode = %timer.mode, remaining = timer.remaining_seconds, "timer paused");
        out.events.push(Event::TimerPaused {
            mode: timer.mode,
            remaining_seconds: timer.remaining_seconds,
            at: self.clock.now(),
        });
        self.save(&mut out);
        out
    }

    /// One tick of the host's one-second timer.
    ///
    /// Reaching zero completes the interval instead of saving directly.
    pub fn advance_one_second(&mut self) -> Outcome {
        let timer = &mut self.store.state_mut().timer;
        if !timer.running {
            return Outcome::default();
        }
        timer.remaining_seconds = timer.remaining_seconds.saturating_sub(1);
        if timer.remaining_seconds > 0 {
            let mut out = Outcome::default();
            self.save(&mut out);
            return out;
        }
        self.complete(false)
    }

    /// Apply up to `seconds` ticks, stopping once the timer is not running.
    pub fn advance(&mut self, seconds: u64) -> Outcome {
        let mut out = Outcome::default();
        for _ in 0..seconds {
            if !self.state().timer.running {
                break;
            }
            out.merge(self.advance_one_second());
        }
        out
    }

    /// Finish the current interval now (manual skip).
    pub fn finish_cycle(&mut self) -> Outcome {
        self.complete(true)
    }

    /// Restart in `mode` with a full interval. Counters are untouched.
    pub fn switch_mode(&mut self, mode: Mode) -> Outcome {
        let mut out = Outcome::default();
        let state = self.store.state_mut();
        cycle::halt(&mut state.timer);
        cycle::reset_to_mode(&mut state.timer, &state.settings, mode);
        debug!(%mode, "mode switched");
        out.events.push(Event::ModeSwitched {
            mode,
            remaining_seconds: state.timer.remaining_seconds,
            at: self.clock.now(),
        });
        self.save(&mut out);
        out
    }

    /// Replace the settings and restart the current interval at its new
    /// full length.
    pub fn apply_settings(&mut self, input: &SettingsInput) -> Outcome {
        let mut out = Outcome::default();
        let state = self.store.state_mut();
        let (settings, fallbacks) = input.resolve(&state.settings);
        for field in &fallbacks {
            warn!(%field, "settings value is not a number, keeping previous value");
        }
        state.settings = settings;
        state.timer.remaining_seconds = state.settings.seconds_for(state.timer.mode);
        debug!(settings = ?state.settings, "settings applied");
        out.events.push(Event::SettingsApplied {
            settings: state.settings.clone(),
            fallbacks,
            remaining_seconds: state.timer.remaining_seconds,
            at: self.clock.now(),
        });
        self.save(&mut out);
        out
    }

    // ── Task commands ────────────────────────────────────────────────

    /// Add a task at the head of the list; it becomes current if no task is.
    ///
    /// # Errors
    /// Rejects a blank name or an estimate that is not a whole number >= 1;
    /// nothing is mutated or saved in that case.
    pub fn add_task(&mut self, input: &TaskInput) -> Result<Outcome, ValidationError> {
        let (name, estimate) = input.validate()?;
        let mut out = Outcome::default();
        let now = self.clock.now();
        let task = Task::new(name, estimate, now.timestamp_millis());
        let state = self.store.state_mut();
        let became_current = state.current_task().is_none();
        if became_current {
            state.current_task_id = Some(task.id.clone());
        }
        debug!(id = %task.id, became_current, "task added");
        out.events.push(Event::TaskAdded {
            task_id: task.id.clone(),
            name: task.name.clone(),
            estimate,
            became_current,
            at: now,
        });
        state.tasks.insert(0, task);
        self.save(&mut out);
        Ok(out)
    }

    /// Make `id` current. The id is not checked against the task list.
    pub fn select_task(&mut self, id: &str) -> Outcome {
        let mut out = Outcome::default();
        self.store.state_mut().current_task_id = Some(id.to_string());
        out.events.push(Event::TaskSelected {
            task_id: id.to_string(),
            at: self.clock.now(),
        });
        self.save(&mut out);
        out
    }

    pub fn delete_task(&mut self, id: &str) -> Outcome {
        let mut out = Outcome::default();
        let state = self.store.state_mut();
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        let removed = state.tasks.len() != before;
        let was_current = state.current_task_id.as_deref() == Some(id);
        if was_current {
            state.current_task_id = None;
        }
        if removed || was_current {
            out.events.push(Event::TaskDeleted {
                task_id: id.to_string(),
                was_current,
                at: self.clock.now(),
            });
        }
        self.save(&mut out);
        out
    }

    /// Replace everything with fresh defaults. The caller confirms first.
    pub fn reset_all(&mut self) -> Outcome {
        let mut out = Outcome::default();
        self.store.replace(AppState::fresh(self.clock.today()));
        info!("all state reset");
        out.events.push(Event::StateReset {
            at: self.clock.now(),
        });
        self.save(&mut out);
        out
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, skipped: bool) -> Outcome {
        let mut out = Outcome::default();
        let state = self.store.state_mut();
        cycle::halt(&mut state.timer);
        let Completion {
            finished,
            next,
            credited_task,
            task_graduated,
        } = cycle::complete_interval(state);
        info!(%finished, %next, skipped, round = state.timer.round, "interval finished");
        out.events.push(Event::CycleCompleted {
            finished,
            next,
            skipped,
            pomodoros_completed: state.timer.pomodoros_completed,
            round: state.timer.round,
            done_today: state.done_today,
            credited_task,
            task_graduated,
            at: self.clock.now(),
        });
        let auto_start = state.settings.auto_start_next;
        // Commit the completion before the next interval starts.
        self.save(&mut out);
        if auto_start {
            out.merge(self.start());
        }
        out
    }

    fn save(&mut self, out: &mut Outcome) {
        if let Err(e) = self.store.save() {
            out.warnings.push(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemorySlot;
    use chrono::NaiveDate;

    fn engine() -> CycleEngine<MemorySlot, FixedClock> {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        CycleEngine::load(MemorySlot::new(), FixedClock::on(day))
    }

    fn writes(e: &CycleEngine<MemorySlot, FixedClock>) -> usize {
        e.store().slot().writes()
    }

    #[test]
    fn start_pause_resume() {
        let mut e = engine();
        assert!(!e.state().timer.running);

        let out = e.start();
        assert!(matches!(out.events[..], [Event::TimerStarted { .. }]));
        assert!(e.state().timer.running);
        assert_eq!(
            e.state().timer.started_at_epoch_millis,
            Some(e.clock().now.timestamp_millis())
        );
        assert!(e.start().is_noop());

        let out = e.pause();
        assert!(matches!(out.events[..], [Event::TimerPaused { .. }]));
        assert!(!e.state().timer.running);
        assert!(e.state().timer.started_at_epoch_millis.is_none());

        assert!(e.start().events.len() == 1);
        assert!(e.state().timer.running);
    }

    #[test]
    fn pause_twice_is_same_as_once() {
        let mut e = engine();
        e.start();
        e.pause();
        let after_first = e.state().clone();
        let saves = writes(&e);
        assert!(e.pause().is_noop());
        assert_eq!(e.state(), &after_first);
        assert_eq!(writes(&e), saves);
    }

    #[test]
    fn tick_is_noop_while_paused() {
        let mut e = engine();
        let out = e.advance_one_second();
        assert!(out.is_noop());
        assert_eq!(e.state().timer.remaining_seconds, 1500);
        assert_eq!(writes(&e), 0);
    }

    #[test]
    fn tick_decrements_and_saves() {
        let mut e = engine();
        e.start();
        let saves = writes(&e);
        let out = e.advance_one_second();
        assert!(out.is_noop());
        assert_eq!(e.state().timer.remaining_seconds, 1499);
        assert_eq!(writes(&e), saves + 1);
    }

    #[test]
    fn last_tick_completes_interval() {
        let mut e = engine();
        e.store_mut().state_mut().timer.remaining_seconds = 1;
        e.start();
        let out = e.advance_one_second();
        match &out.events[..] {
            [Event::CycleCompleted {
                finished,
                next,
                skipped,
                ..
            }] => {
                assert_eq!(*finished, Mode::Pomodoro);
                assert_eq!(*next, Mode::ShortBreak);
                assert!(!skipped);
            }
            other => panic!("expected CycleCompleted, got {other:?}"),
        }
        assert!(!e.state().timer.running);
        assert_eq!(e.state().timer.remaining_seconds, 300);
        assert_eq!(e.state().done_today, 1);
    }

    #[test]
    fn auto_start_runs_next_interval() {
        let mut e = engine();
        e.store_mut().state_mut().settings.auto_start_next = true;
        let out = e.finish_cycle();
        assert!(matches!(
            out.events[..],
            [Event::CycleCompleted { .. }, Event::TimerStarted { .. }]
        ));
        assert!(e.state().timer.running);
        assert_eq!(e.state().timer.mode, Mode::ShortBreak);

        let records: Vec<serde_json::Value> = e
            .store()
            .slot()
            .history()
            .iter()
            .map(|raw| serde_json::from_str(raw).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        // The completion is committed paused, then the next interval starts.
        assert_eq!(records[0]["timer"]["mode"], "shortBreak");
        assert_eq!(records[0]["timer"]["running"], false);
        assert_eq!(records[0]["doneToday"], 1);
        assert_eq!(records[1]["timer"]["mode"], "shortBreak");
        assert_eq!(records[1]["timer"]["running"], true);
        assert_eq!(records[1]["doneToday"], 1);
        assert_eq!(e.store().slot().contents(), Some(e.store().slot().history()[1].as_str()));
    }

    #[test]
    fn advance_runs_through_interval_end() {
        let mut e = engine();
        e.store_mut().state_mut().timer.remaining_seconds = 3;
        e.start();
        let out = e.advance(10);
        assert_eq!(out.events.len(), 1);
        assert_eq!(e.state().timer.mode, Mode::ShortBreak);
        assert!(!e.state().timer.running);
        assert_eq!(e.state().timer.remaining_seconds, 300);
    }

    #[test]
    fn switch_mode_resets_without_credit() {
        let mut e = engine();
        e.start();
        e.advance(100);
        let out = e.switch_mode(Mode::LongBreak);
        assert!(matches!(out.events[..], [Event::ModeSwitched { .. }]));
        assert_eq!(e.state().timer.mode, Mode::LongBreak);
        assert_eq!(e.state().timer.remaining_seconds, 15 * 60);
        assert!(!e.state().timer.running);
        assert_eq!(e.state().done_today, 0);
        assert_eq!(e.state().timer.round, 1);
    }

    #[test]
    fn settings_restart_current_interval() {
        let mut e = engine();
        e.start();
        e.advance(600);
        let mut input = SettingsInput::from(&e.state().settings);
        input.pomodoro_minutes = "50".into();
        e.apply_settings(&input);
        assert_eq!(e.state().settings.pomodoro_minutes, 50);
        assert_eq!(e.state().timer.remaining_seconds, 50 * 60);
        assert!(e.state().timer.running);
    }

    #[test]
    fn add_task_prepends_and_selects_first() {
        let mut e = engine();
        e.add_task(&TaskInput::new("first", 2)).unwrap();
        e.add_task(&TaskInput::new("second", 1)).unwrap();
        let s = e.state();
        assert_eq!(s.tasks[0].name, "second");
        assert_eq!(s.tasks[1].name, "first");
        assert_eq!(s.current_task().map(|t| t.name.as_str()), Some("first"));
        assert_eq!(s.tasks[0].created_at, e.clock().now.timestamp_millis());
    }

    #[test]
    fn add_task_replaces_dangling_current() {
        let mut e = engine();
        e.select_task("missing");
        let out = e.add_task(&TaskInput::new("real", 1)).unwrap();
        assert!(matches!(
            out.events[..],
            [Event::TaskAdded {
                became_current: true,
                ..
            }]
        ));
        assert_eq!(e.state().current_task().map(|t| t.name.as_str()), Some("real"));
    }

    #[test]
    fn rejected_task_does_not_save() {
        let mut e = engine();
        let err = e.add_task(&TaskInput::new("   ", 1)).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTaskName);
        assert!(e.state().tasks.is_empty());
        assert_eq!(writes(&e), 0);
    }

    #[test]
    fn delete_current_task_clears_selection() {
        let mut e = engine();
        e.add_task(&TaskInput::new("a", 1)).unwrap();
        let id = e.state().tasks[0].id.clone();
        let out = e.delete_task(&id);
        assert!(matches!(
            out.events[..],
            [Event::TaskDeleted {
                was_current: true,
                ..
            }]
        ));
        assert!(e.state().tasks.is_empty());
        assert!(e.state().current_task_id.is_none());
    }

    #[test]
    fn delete_other_task_keeps_selection() {
        let mut e = engine();
        e.add_task(&TaskInput::new("a", 1)).unwrap();
        e.add_task(&TaskInput::new("b", 1)).unwrap();
        let b = e.state().tasks[0].id.clone();
        e.delete_task(&b);
        assert_eq!(e.state().tasks.len(), 1);
        assert_eq!(e.state().current_task().map(|t| t.name.as_str()), Some("a"));
    }

    #[test]
    fn reset_all_uses_clock_date() {
        let mut e = engine();
        e.add_task(&TaskInput::new("a", 1)).unwrap();
        e.finish_cycle();
        let later = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        *e.clock_mut() = FixedClock::on(later);
        e.reset_all();
        assert_eq!(e.state(), &AppState::fresh(later));
    }

    #[test]
    fn failed_saves_are_reported_not_fatal() {
        let mut e = engine();
        e.store_mut().slot_mut().set_fail_writes(true);
        e.store_mut().state_mut().settings.auto_start_next = true;
        let out = e.finish_cycle();
        assert_eq!(out.events.len(), 2);
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(e.state().done_today, 1);
        assert!(e.state().timer.running);
    }

    #[test]
    fn finishing_at_counter_limits_does_not_overflow() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let raw = format!(
            r#"{{
                "timer": {{"round": {max}, "pomodorosCompleted": {max}}},
                "tasks": [{{"id": "x", "name": "huge", "estimate": {max}, "done": {max}}}],
                "today": "2024-03-01",
                "doneToday": {max}
            }}"#,
            max = u32::MAX
        );
        let mut e = CycleEngine::load(MemorySlot::with_contents(raw), FixedClock::on(day));
        e.select_task("x");
        e.finish_cycle();
        let s = e.state();
        assert_eq!(s.timer.round, u32::MAX);
        assert_eq!(s.timer.pomodoros_completed, u32::MAX);
        assert_eq!(s.done_today, u32::MAX);
        assert_eq!(s.tasks[0].done, u32::MAX);
        assert!(s.current_task_id.is_none());

        let huge = TaskInput::new("limit", u32::MAX);
        e.add_task(&huge).unwrap();
        e.finish_cycle();
        e.finish_cycle();
        assert_eq!(e.state().tasks[0].done, 1);
        assert!(e.state().timer.round >= 1);
    }
}
