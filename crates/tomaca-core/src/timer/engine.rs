//! Work session state machine.
//!
//! The machine does not keep time itself. An external countdown driver
//! reports the seconds left in the current phase whenever it ends, and the
//! machine accumulates the elapsed part into the session total.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Start -> ShortPause -> Start -> ... -> LongPause -> Finish
//!          ^__________________________|
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut machine = SessionMachine::new(StorageController::new(Database::open()?));
//! machine.set_and_start(15, "thesis");
//! machine.pause(0, true);   // work interval ran out
//! machine.start(0, true);   // short break ran out
//! ```

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info, warn};

use super::config::TimerConfiguration;
use super::progress;
use super::session::{Phase, TimerState, WorkSession};
use crate::events::Event;
use crate::format::{self, day_key};
use crate::record::{WorkRecord, WorkString};
use crate::storage::{PersistenceStore, StorageController};

/// Work intervals before the break turns into a long one.
const WORK_INTERVALS_PER_CYCLE: u32 = 4;

pub struct SessionMachine<S> {
    state: TimerState,
    session: WorkSession,
    /// Template for fresh sessions; `long_break_time` is replaced by the
    /// persisted value on every `initialize`.
    defaults: TimerConfiguration,
    storage: StorageController<S>,
}

impl<S: PersistenceStore> SessionMachine<S> {
    pub fn new(storage: StorageController<S>) -> Self {
        Self::with_defaults(storage, TimerConfiguration::default())
    }

    /// Create an `Idle` machine whose sessions start from `defaults`.
    pub fn with_defaults(storage: StorageController<S>, defaults: TimerConfiguration) -> Self {
        let session = WorkSession::new(defaults.clone(), Local::now());
        let mut machine = Self {
            state: TimerState::Idle,
            session,
            defaults,
            storage,
        };
        machine.initialize();
        machine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn session(&self) -> &WorkSession {
        &self.session
    }

    pub fn storage(&self) -> &StorageController<S> {
        &self.storage
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state.name().to_string(),
            session: self.state.session().cloned(),
            at: Utc::now(),
        }
    }

    /// Index of the cached record for the session's start day, or `-1`.
    pub fn is_date_in(&self) -> isize {
        self.find_day_record().map_or(-1, |i| i as isize)
    }

    pub fn find_day_record(&self) -> Option<usize> {
        let day = day_key(&self.session.date);
        self.storage
            .work_list()
            .iter()
            .position(|r| day_key(&r.date) == day)
    }

    /// Display strings for the records captured by the last `finish`.
    pub fn work_list_string(&self) -> Vec<WorkString> {
        format::work_list_strings(&self.session.work_list)
    }

    pub fn time_string(&self, seconds: i64) -> String {
        format::time_string(seconds)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Discard the current session and go back to `Idle`.
    pub fn initialize(&mut self) -> Option<Event> {
        self.initialize_at(Local::now())
    }

    /// [`initialize`](Self::initialize) with an explicit session start time.
    pub fn initialize_at(&mut self, date: DateTime<Local>) -> Option<Event> {
        let mut config = self.defaults.clone();
        config.long_break_time = self.storage.get_long_break();
        let long_break_secs = config.long_break_time;
        self.session = WorkSession::new(config, date);
        self.state = TimerState::Idle;
        debug!(long_break_secs, "session initialized");
        Some(Event::SessionReset {
            long_break_secs,
            at: Utc::now(),
        })
    }

    /// Resume from a state persisted by an earlier run.
    pub fn restore(&mut self, state: TimerState) {
        match state.session().cloned() {
            Some(session) => {
                self.session = session;
                self.state = state;
            }
            None => {
                self.initialize();
            }
        }
    }

    /// Pick the long break (minutes) and task, then begin the first work interval.
    pub fn set_and_start(&mut self, long_break_minutes: i64, task: impl Into<String>) -> Option<Event> {
        if !matches!(self.state, TimerState::Idle) {
            warn!(state = self.state.name(), "set_and_start ignored outside idle");
            return None;
        }
        self.update_long_break(long_break_minutes);
        self.session.task = task.into();
        self.start(0, false)
    }

    /// Persist the long break only when it differs from the session's value.
    pub fn update_long_break(&mut self, long_break_minutes: i64) {
        let seconds = long_break_minutes.saturating_mul(60);
        if seconds != self.session.timer_config.long_break_time {
            self.session.timer_config.long_break_time = seconds;
            self.storage.save_long_break(seconds);
        }
    }

    /// Begin a work interval, from `Idle` or when a break ends.
    ///
    /// Elapsed time is measured against the short break duration whichever
    /// break just ended.
    pub fn start(&mut self, time: i64, is_completed: bool) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::ShortPause(_) | TimerState::LongPause(_) => {}
            _ => {
                warn!(state = self.state.name(), "start ignored");
                return None;
            }
        }
        self.session.current_state = Phase::Work;
        self.session.total_time = self
            .session
            .total_time
            .saturating_add(self.session.timer_config.short_break_time.saturating_sub(time));
        self.update_progress(is_completed);
        self.session.current_state_title = self.session.timer_config.work_title.clone();
        self.session.counter_main += 1;
        self.state = TimerState::Start(self.session.clone());
        debug!(counter_main = self.session.counter_main, total_time = self.session.total_time, "work started");
        Some(Event::WorkStarted {
            task: self.session.task.clone(),
            counter_main: self.session.counter_main,
            total_time: self.session.total_time,
            progress: self.session.progress.clone(),
            at: Utc::now(),
        })
    }

    /// End a work interval and enter the matching break.
    pub fn pause(&mut self, time: i64, is_completed: bool) -> Option<Event> {
        if !matches!(self.state, TimerState::Start(_)) {
            warn!(state = self.state.name(), "pause ignored");
            return None;
        }
        self.session.total_time = self
            .session
            .total_time
            .saturating_add(self.session.timer_config.main_time.saturating_sub(time));
        self.session.current_state_title = self.session.timer_config.break_title.clone();
        self.update_progress(is_completed);
        if self.session.counter_main < WORK_INTERVALS_PER_CYCLE {
            self.short_pause();
        } else {
            self.long_pause();
        }
        debug!(phase = ?self.session.current_state, total_time = self.session.total_time, "break started");
        Some(Event::BreakStarted {
            phase: self.session.current_state,
            counter_main: self.session.counter_main,
            total_time: self.session.total_time,
            progress: self.session.progress.clone(),
            at: Utc::now(),
        })
    }

    /// End the long break and fold the session total into today's record.
    ///
    /// A new day record is saved right away. An existing one is only
    /// updated in the cache: nothing writes it back until the next save
    /// of the record list.
    pub fn finish(&mut self, time: i64) -> Option<Event> {
        if !matches!(self.state, TimerState::LongPause(_)) {
            warn!(state = self.state.name(), "finish ignored");
            return None;
        }
        self.session.total_time = self
            .session
            .total_time
            .saturating_add(self.session.timer_config.long_break_time.saturating_sub(time));
        let total_time = self.session.total_time;

        let (day_total, persisted) = match self.find_day_record() {
            Some(i) => {
                let record = &mut self.storage.work_list_mut()[i];
                record.time = record.time.saturating_add(total_time);
                warn!(day = %day_key(&record.date), "day record updated in memory only");
                (record.time, false)
            }
            None => {
                let mut records = self.storage.work_list().to_vec();
                records.push(WorkRecord::new(
                    self.session.task.clone(),
                    self.session.date,
                    total_time,
                ));
                self.storage.save(records);
                (total_time, true)
            }
        };

        self.session.work_list = self.storage.work_list().to_vec();
        self.state = TimerState::Finish(self.session.clone());
        info!(task = %self.session.task, total_time, day_total, "session finished");
        Some(Event::SessionFinished {
            task: self.session.task.clone(),
            day: day_key(&self.session.date),
            total_time,
            day_total,
            persisted,
            at: Utc::now(),
        })
    }

    /// Persist an empty record list. The session's display copy is kept.
    pub fn clear_work_list(&mut self) {
        self.storage.save(Vec::new());
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn short_pause(&mut self) {
        self.session.current_state = Phase::ShortPause;
        self.state = TimerState::ShortPause(self.session.clone());
    }

    fn long_pause(&mut self) {
        self.session.current_state = Phase::LongPause;
        self.state = TimerState::LongPause(self.session.clone());
    }

    fn update_progress(&mut self, is_complete: bool) {
        if self.session.counter_main == 0 {
            return;
        }
        let config = &self.session.timer_config;
        let symbol = if is_complete {
            &config.complete_symbol
        } else {
            &config.incomplete_symbol
        };
        self.session.progress = progress::advance(
            &self.session.progress,
            &config.cursor_symbol,
            symbol,
            &mut self.session.current_cursor,
        );
    }
}
