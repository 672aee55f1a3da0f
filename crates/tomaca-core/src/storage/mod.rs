mod config;
mod controller;
pub mod database;

pub use config::{Config, TimerSection};
pub use controller::{StorageController, LONG_BREAK_KEY, WORK_LIST_KEY};
pub use database::Database;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::{Result, StorageError};

/// Durable string key-value store behind [`StorageController`].
pub trait PersistenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store. Clones share the same map, so a test can keep a handle
/// and inspect what was persisted after handing a clone to the controller.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Returns the data directory, creating it if needed.
///
/// `TOMACA_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/tomaca[-dev]/`, with `TOMACA_ENV=dev` selecting the dev directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TOMACA_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TOMACA_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tomaca-dev")
            } else {
                base_dir.join("tomaca")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
