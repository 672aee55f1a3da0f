use serde::{Deserialize, Serialize};

/// Durations (seconds), titles and progress symbols of one work session.
///
/// Everything here is fixed for the life of a session except
/// `long_break_time`, which the user picks when starting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfiguration {
    pub main_time: i64,
    pub short_break_time: i64,
    pub long_break_time: i64,
    pub work_title: String,
    pub break_title: String,
    pub complete_symbol: String,
    pub incomplete_symbol: String,
    pub cursor_symbol: String,
    /// Placeholder token for a slot that has not been reached yet.
    pub slot_symbol: String,
    /// Number of tokens in the progress indicator.
    pub slots: usize,
}

impl Default for TimerConfiguration {
    fn default() -> Self {
        Self {
            main_time: 25 * 60,
            short_break_time: 5 * 60,
            long_break_time: 15 * 60,
            work_title: "Work".into(),
            break_title: "Break".into(),
            complete_symbol: "✓".into(),
            incomplete_symbol: "✗".into(),
            cursor_symbol: "◂".into(),
            slot_symbol: "·".into(),
            slots: 8,
        }
    }
}
