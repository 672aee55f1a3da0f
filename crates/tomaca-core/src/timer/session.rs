use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::config::TimerConfiguration;
use super::progress::initial_progress;
use crate::record::WorkRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortPause,
    LongPause,
}

/// Mutable state of one work/break cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSession {
    pub task: String,
    /// When the session was created; decides which day record it counts toward.
    pub date: DateTime<Local>,
    /// Seconds accumulated over every phase so far.
    pub total_time: i64,
    pub current_state: Phase,
    pub current_state_title: String,
    /// Work intervals started so far (0..=4).
    pub counter_main: u32,
    pub progress: String,
    pub current_cursor: usize,
    pub timer_config: TimerConfiguration,
    /// Display copy of the day records, captured when the session finishes.
    #[serde(default)]
    pub work_list: Vec<WorkRecord>,
}

impl WorkSession {
    pub fn new(timer_config: TimerConfiguration, date: DateTime<Local>) -> Self {
        Self {
            task: String::new(),
            date,
            total_time: 0,
            current_state: Phase::Work,
            current_state_title: String::new(),
            counter_main: 0,
            progress: initial_progress(&timer_config),
            current_cursor: 0,
            timer_config,
            work_list: Vec::new(),
        }
    }
}

/// Discriminated machine state. Every non-idle variant carries a snapshot
/// of the session as it was when the state was entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "session", rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Start(WorkSession),
    ShortPause(WorkSession),
    LongPause(WorkSession),
    Finish(WorkSession),
}

impl TimerState {
    pub fn session(&self) -> Option<&WorkSession> {
        match self {
            TimerState::Idle => None,
            TimerState::Start(s)
            | TimerState::ShortPause(s)
            | TimerState::LongPause(s)
            | TimerState::Finish(s) => Some(s),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Start(_) => "start",
            TimerState::ShortPause(_) => "short_pause",
            TimerState::LongPause(_) => "long_pause",
            TimerState::Finish(_) => "finish",
        }
    }
}
