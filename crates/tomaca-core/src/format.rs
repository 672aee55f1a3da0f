//! Display helpers shared by the session machine and the CLI.

use chrono::{DateTime, Local};

use crate::record::{WorkRecord, WorkString};

const DAY_KEY_FORMAT: &str = "%d-%m-%Y";

/// Format seconds as `MM:SS`.
///
/// Minutes wrap at 60, so hours are not shown: `3725` renders as `"02:05"`.
pub fn time_string(seconds: i64) -> String {
    let minutes = seconds / 60 % 60;
    let secs = seconds % 60;
    format!("{minutes:02}:{secs:02}")
}

/// Canonical calendar-day key used to match records, e.g. `"16-10-2026"`.
pub fn day_key(date: &DateTime<Local>) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

pub fn work_list_strings(records: &[WorkRecord]) -> Vec<WorkString> {
    records
        .iter()
        .map(|r| WorkString {
            task: r.task.clone(),
            date: day_key(&r.date),
            time: time_string(r.time),
        })
        .collect()
}
