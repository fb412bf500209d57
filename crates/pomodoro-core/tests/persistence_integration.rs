//! Reload behavior across the real storage backends.

use chrono::NaiveDate;
use pomodoro_core::{
    AppState, CycleEngine, FixedClock, JsonFileSlot, LoadSource, Mode, SqliteSlot, StateSlot,
    TaskInput,
};
use tempfile::TempDir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

/// Run a short day on `slot`, then reload it on `reload_day`.
fn day_then_reload<S: StateSlot>(slot: S, reload_day: NaiveDate) -> CycleEngine<S, FixedClock> {
    let mut e = CycleEngine::load(slot, FixedClock::on(day(20)));
    e.add_task(&TaskInput::new("Draft", 5)).unwrap();
    e.finish_cycle();
    e.finish_cycle();
    e.finish_cycle();
    assert_eq!(e.state().done_today, 2);
    assert_eq!(e.state().timer.mode, Mode::ShortBreak);

    let slot = e.into_store().into_slot();
    CycleEngine::load(slot, FixedClock::on(reload_day))
}

#[test]
fn sqlite_same_day_reload_keeps_counters() {
    let dir = TempDir::new().unwrap();
    let slot = SqliteSlot::open(dir.path().join("p.db")).unwrap();
    let e = day_then_reload(slot, day(20));
    assert!(matches!(e.store().load_report().source, LoadSource::Restored));
    assert_eq!(e.state().done_today, 2);
    assert_eq!(e.state().timer.round, 3);
    assert_eq!(e.state().tasks[0].done, 2);
}

#[test]
fn sqlite_next_day_reload_rolls_over() {
    let dir = TempDir::new().unwrap();
    let slot = SqliteSlot::open(dir.path().join("p.db")).unwrap();
    let e = day_then_reload(slot, day(21));
    let s = e.state();
    assert!(e.store().load_report().rolled_over);
    assert_eq!(s.today, day(21));
    assert_eq!(s.done_today, 0);
    assert_eq!(s.timer.pomodoros_completed, 0);
    assert_eq!(s.timer.round, 1);
    assert_eq!(s.timer.mode, Mode::ShortBreak);
    assert_eq!(s.tasks.len(), 1);
    assert_eq!(s.tasks[0].done, 2);
}

#[test]
fn json_file_next_day_reload_rolls_over() {
    let dir = TempDir::new().unwrap();
    let slot = JsonFileSlot::new(dir.path().join("state.json"));
    let e = day_then_reload(slot, day(22));
    assert!(e.store().load_report().rolled_over);
    assert_eq!(e.state().done_today, 0);
    assert_eq!(e.state().settings.pomodoro_minutes, 25);
}

#[test]
fn corrupt_file_starts_fresh_and_is_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{\"timer\": 12").unwrap();

    let mut e = CycleEngine::load(JsonFileSlot::new(&path), FixedClock::on(day(20)));
    assert!(matches!(
        e.store().load_report().source,
        LoadSource::Corrupt { .. }
    ));
    assert_eq!(e.state(), &AppState::fresh(day(20)));

    e.start();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"timer\": {\n"), "record is not pretty-printed: {text}");
    let parsed: AppState = serde_json::from_str(&text).unwrap();
    assert!(parsed.timer.running);
}

#[test]
fn unreadable_slot_starts_fresh() {
    let dir = TempDir::new().unwrap();
    // A directory where the file should be cannot be read as a string.
    let path = dir.path().join("state.json");
    std::fs::create_dir(&path).unwrap();

    let mut e = CycleEngine::load(JsonFileSlot::new(&path), FixedClock::on(day(20)));
    assert!(matches!(
        e.store().load_report().source,
        LoadSource::Unreadable(_)
    ));
    let out = e.start();
    assert!(e.state().timer.running);
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn legacy_browser_record_is_accepted() {
    let raw = r#"{
        "settings": {"pomodoroMin": 30, "shortMin": 5, "longMin": 20, "longEvery": 3, "autoStartNext": false},
        "timer": {"mode": "pomodoro", "remainingSec": 900, "running": false, "startedAt": null, "pomodorosDone": 1, "round": 2},
        "tasks": [{"id": "x1", "name": "Read", "est": 2, "done": 1, "createdAt": 1716200000000}],
        "currentTaskId": "x1",
        "today": "2024-05-20",
        "doneToday": 1
    }"#;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, raw).unwrap();

    let mut e = CycleEngine::load(JsonFileSlot::new(&path), FixedClock::on(day(20)));
    assert_eq!(e.store().load_report().stored_version, Some(0));
    assert_eq!(e.state().timer.remaining_seconds, 900);
    e.finish_cycle();
    assert_eq!(e.state().tasks[0].done, 2);
    assert!(e.state().current_task_id.is_none());
    assert_eq!(e.state().timer.mode, Mode::ShortBreak);
    assert_eq!(e.state().timer.remaining_seconds, 5 * 60);

    // The browser build stored unrounded numbers from its settings form.
    let fractional = r#"{
        "settings": {"pomodoroMin": 2.5, "shortMin": 5, "longMin": 20, "longEvery": 3},
        "timer": {"mode": "pomodoro", "remainingSec": 150, "pomodorosDone": 1, "round": 2},
        "tasks": [{"id": "x2", "name": "Plan", "est": 1.5, "done": 0, "createdAt": 1716200000000}],
        "currentTaskId": "x2",
        "today": "2024-05-20",
        "doneToday": 1
    }"#;
    std::fs::write(&path, fractional).unwrap();
    let e = CycleEngine::load(JsonFileSlot::new(&path), FixedClock::on(day(20)));
    assert!(matches!(e.store().load_report().source, LoadSource::Restored));
    assert_eq!(e.state().settings.pomodoro_minutes, 2);
    assert_eq!(e.state().timer.remaining_seconds, 150);
    assert_eq!(e.state().tasks.len(), 1);
    assert_eq!(e.state().tasks[0].estimate, 1);
    assert_eq!(e.state().done_today, 1);
    assert_eq!(e.state().current_task_id.as_deref(), Some("x2"));
}
