use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, WorkSession};

/// Every state change of the session machine produces an Event.
/// The CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionReset {
        long_break_secs: i64,
        at: DateTime<Utc>,
    },
    WorkStarted {
        task: String,
        counter_main: u32,
        total_time: i64,
        progress: String,
        at: DateTime<Utc>,
    },
    BreakStarted {
        phase: Phase,
        counter_main: u32,
        total_time: i64,
        progress: String,
        at: DateTime<Utc>,
    },
    SessionFinished {
        task: String,
        day: String,
        total_time: i64,
        /// Accumulated seconds for the day after this session.
        day_total: i64,
        /// False when an existing day record was updated only in memory.
        persisted: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: String,
        session: Option<WorkSession>,
        at: DateTime<Utc>,
    },
}
