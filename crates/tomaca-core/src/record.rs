use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Accumulated work time for one task on one calendar day.
///
/// Day matching only looks at [`day_key`](crate::format::day_key) of `date`;
/// the task name is carried along for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRecord {
    pub task: String,
    pub date: DateTime<Local>,
    /// Seconds.
    pub time: i64,
}

impl WorkRecord {
    pub fn new(task: impl Into<String>, date: DateTime<Local>, time: i64) -> Self {
        Self {
            task: task.into(),
            date,
            time,
        }
    }
}

/// Display projection of a [`WorkRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkString {
    pub task: String,
    pub date: String,
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_json_uses_rfc3339_date() {
        let date = Local.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let record = WorkRecord::new("write report", date, 1500);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["task"], "write report");
        assert_eq!(json["time"], 1500);
        let parsed: DateTime<Local> = json["date"].as_str().unwrap().parse().unwrap();
        assert_eq!(parsed, date);
    }
}
