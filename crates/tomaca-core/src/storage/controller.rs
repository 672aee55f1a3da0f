//! Work record persistence for the session machine.
//!
//! The controller keeps an in-memory copy of the record list (`work_list`)
//! that the session machine treats as the source of truth during a run.
//! The cache is never auto-flushed: only [`StorageController::save`] writes.

use tracing::{debug, warn};

use super::PersistenceStore;
use crate::record::WorkRecord;
use crate::timer::TimerConfiguration;

pub const WORK_LIST_KEY: &str = "workList";
pub const LONG_BREAK_KEY: &str = "longBreak";

pub struct StorageController<S> {
    store: S,
    work_list: Vec<WorkRecord>,
    default_long_break: i64,
}

impl<S: PersistenceStore> StorageController<S> {
    /// Wrap `store` and eagerly load the persisted record list.
    pub fn new(store: S) -> Self {
        Self::with_default_long_break(store, TimerConfiguration::default().long_break_time)
    }

    /// Like [`new`](Self::new), with the fallback returned by
    /// [`get_long_break`](Self::get_long_break) when nothing is stored.
    pub fn with_default_long_break(store: S, default_long_break: i64) -> Self {
        let mut controller = Self {
            store,
            work_list: Vec::new(),
            default_long_break,
        };
        controller.work_list = controller.load();
        controller
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn work_list(&self) -> &[WorkRecord] {
        &self.work_list
    }

    /// Mutable access to the cache. Changes made here are not persisted
    /// until the next [`save`](Self::save).
    pub fn work_list_mut(&mut self) -> &mut Vec<WorkRecord> {
        &mut self.work_list
    }

    /// Read the persisted record list. Any failure yields an empty list.
    pub fn load(&self) -> Vec<WorkRecord> {
        let raw = match self.store.get(WORK_LIST_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("unable to read work list: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<WorkRecord>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("unable to decode work list: {e}");
                Vec::new()
            }
        }
    }

    /// Replace the persisted record list with `records`.
    ///
    /// The cache is replaced only once the write succeeds; on failure both
    /// the cache and the stored value keep their previous contents.
    pub fn save(&mut self, records: Vec<WorkRecord>) {
        let json = match serde_json::to_string(&records) {
            Ok(json) => json,
            Err(e) => {
                warn!("unable to encode work list: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(WORK_LIST_KEY, &json) {
            warn!("unable to write work list: {e}");
            return;
        }
        debug!(records = records.len(), "work list saved");
        self.work_list = records;
    }

    /// Persisted long-break duration in seconds, or the configured default.
    pub fn get_long_break(&self) -> i64 {
        match self.store.get(LONG_BREAK_KEY) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|e| {
                warn!("ignoring unparsable long break {raw:?}: {e}");
                self.default_long_break
            }),
            Ok(None) => self.default_long_break,
            Err(e) => {
                warn!("unable to read long break: {e}");
                self.default_long_break
            }
        }
    }

    pub fn save_long_break(&mut self, seconds: i64) {
        match self.store.set(LONG_BREAK_KEY, &seconds.to_string()) {
            Ok(()) => debug!(seconds, "long break saved"),
            Err(e) => warn!("unable to write long break: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;
    use chrono::{Local, TimeZone};
    use proptest::prelude::*;

    /// Store whose writes always fail.
    #[derive(Clone, Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
    }

    impl PersistenceStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }
    }

    fn record(task: &str, day: u32, time: i64) -> WorkRecord {
        WorkRecord::new(task, Local.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap(), time)
    }

    #[test]
    fn empty_store_loads_empty_list() {
        let controller = StorageController::new(MemoryStore::new());
        assert!(controller.work_list().is_empty());
        assert!(controller.load().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let mut controller = StorageController::new(MemoryStore::new());
        let records = vec![record("b", 2, 10), record("a", 1, 20), record("c", 3, 30)];
        controller.save(records.clone());
        assert_eq!(controller.load(), records);
        assert_eq!(controller.work_list(), records.as_slice());
    }

    #[test]
    fn construction_loads_existing_records() {
        let store = MemoryStore::new();
        StorageController::new(store.clone()).save(vec![record("a", 1, 60)]);
        let reopened = StorageController::new(store);
        assert_eq!(reopened.work_list().len(), 1);
        assert_eq!(reopened.work_list()[0].time, 60);
    }

    #[test]
    fn corrupt_work_list_loads_empty() {
        let store = MemoryStore::new();
        store.set(WORK_LIST_KEY, "{not json").unwrap();
        let controller = StorageController::new(store);
        assert!(controller.work_list().is_empty());
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let store = ReadOnlyStore::default();
        let previous = serde_json::to_string(&vec![record("a", 1, 60)]).unwrap();
        store.inner.set(WORK_LIST_KEY, &previous).unwrap();

        let mut controller = StorageController::new(store.clone());
        controller.save(Vec::new());

        assert_eq!(controller.work_list().len(), 1);
        assert_eq!(store.inner.get(WORK_LIST_KEY).unwrap(), Some(previous));
    }

    #[test]
    fn cache_mutation_is_not_persisted_without_save() {
        let store = MemoryStore::new();
        let mut controller = StorageController::new(store.clone());
        controller.save(vec![record("a", 1, 60)]);
        controller.work_list_mut()[0].time = 999;

        assert_eq!(controller.work_list()[0].time, 999);
        assert_eq!(controller.load()[0].time, 60);
    }

    #[test]
    fn long_break_defaults_until_saved() {
        let mut controller = StorageController::with_default_long_break(MemoryStore::new(), 900);
        assert_eq!(controller.get_long_break(), 900);
        controller.save_long_break(1200);
        assert_eq!(controller.get_long_break(), 1200);
    }

    #[test]
    fn unparsable_long_break_falls_back_to_default() {
        let store = MemoryStore::new();
        store.set(LONG_BREAK_KEY, "twenty").unwrap();
        let controller = StorageController::with_default_long_break(store, 900);
        assert_eq!(controller.get_long_break(), 900);
    }

    proptest! {
        #[test]
        fn save_load_round_trip(
            entries in prop::collection::vec(("[a-z ]{0,12}", 0i64..2_000_000_000, 0i64..100_000), 0..8)
        ) {
            let records: Vec<WorkRecord> = entries
                .into_iter()
                .map(|(task, ts, time)| {
                    WorkRecord::new(task, Local.timestamp_opt(ts, 0).unwrap(), time)
                })
                .collect();
            let mut controller = StorageController::new(MemoryStore::new());
            controller.save(records.clone());
            prop_assert_eq!(controller.load(), records);
        }
    }
}
