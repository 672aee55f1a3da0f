//! Full work cycles against an on-disk SQLite store.

use chrono::{DateTime, Local, TimeZone};
use tomaca_core::{Database, SessionMachine, StorageController, TimerState};

fn at(day: u32, hour: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap()
}

/// Run one full cycle where every phase ends with `left` seconds remaining.
fn run_cycle(machine: &mut SessionMachine<Database>, date: DateTime<Local>, task: &str, left: i64) -> i64 {
    machine.initialize_at(date);
    machine.set_and_start(15, task).unwrap();
    for _ in 0..3 {
        machine.pause(left, true).unwrap();
        machine.start(left, true).unwrap();
    }
    machine.pause(left, true).unwrap();
    assert!(matches!(machine.state(), TimerState::LongPause(_)));
    machine.finish(left).unwrap();
    machine.session().total_time
}

fn open(path: &std::path::Path) -> SessionMachine<Database> {
    SessionMachine::new(StorageController::new(Database::open_at(path).unwrap()))
}

#[test]
fn cycle_totals_every_phase() {
    let dir = tempfile::tempdir().unwrap();
    let mut machine = open(&dir.path().join("tomaca.db"));

    let total = run_cycle(&mut machine, at(16, 9), "thesis", 0);
    // Initial start, 3 break starts (short baseline), 4 work intervals, long break.
    assert_eq!(total, 4 * 5 * 60 + 4 * 25 * 60 + 15 * 60);
    assert!(matches!(machine.state(), TimerState::Finish(_)));
}

#[test]
fn two_sessions_same_day_share_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tomaca.db");
    let mut machine = open(&path);

    let first = run_cycle(&mut machine, at(16, 9), "thesis", 0);
    let second = run_cycle(&mut machine, at(16, 15), "email", 60);

    let cached = machine.storage().work_list();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].time, first + second);
    assert_eq!(machine.session().work_list, cached.to_vec());

    // The second session only updated the in-memory record; the store still
    // holds what the first session saved.
    let persisted = StorageController::new(Database::open_at(&path).unwrap()).load();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].time, first);
}

#[test]
fn sessions_on_different_days_get_separate_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tomaca.db");
    let mut machine = open(&path);

    run_cycle(&mut machine, at(15, 9), "a", 0);
    run_cycle(&mut machine, at(16, 9), "b", 0);

    let persisted = StorageController::new(Database::open_at(&path).unwrap()).load();
    let tasks: Vec<_> = persisted.iter().map(|r| r.task.as_str()).collect();
    assert_eq!(tasks, ["a", "b"]);
    let days: Vec<_> = machine.work_list_string().into_iter().map(|w| w.date).collect();
    assert_eq!(days, ["15-10-2026", "16-10-2026"]);
}

#[test]
fn clear_then_load_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tomaca.db");
    let mut machine = open(&path);
    run_cycle(&mut machine, at(16, 9), "a", 0);

    machine.clear_work_list();
    assert!(machine.storage().work_list().is_empty());
    let persisted = StorageController::new(Database::open_at(&path).unwrap()).load();
    assert!(persisted.is_empty());
}

#[test]
fn long_break_choice_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tomaca.db");
    {
        let mut machine = open(&path);
        machine.set_and_start(30, "a").unwrap();
    }
    let machine = open(&path);
    assert_eq!(machine.session().timer_config.long_break_time, 30 * 60);
}
