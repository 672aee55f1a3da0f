//! # Tomaca Core Library
//!
//! Core logic for the Tomaca Pomodoro timer: a work/break session state
//! machine and the per-day work records it produces.
//!
//! ## Architecture
//!
//! - **Session machine**: driven by an external countdown that reports the
//!   seconds left whenever a phase ends
//! - **Storage**: a key-value store (SQLite in production) holding the day
//!   records and the long-break setting, plus TOML configuration
//!
//! ## Key Components
//!
//! - [`SessionMachine`]: work/short break/long break state machine
//! - [`StorageController`]: cached record list over a [`PersistenceStore`]
//! - [`Database`]: SQLite key-value store
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod format;
pub mod record;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use format::{day_key, time_string};
pub use record::{WorkRecord, WorkString};
pub use storage::{Config, Database, MemoryStore, PersistenceStore, StorageController};
pub use timer::{Phase, SessionMachine, TimerConfiguration, TimerState, WorkSession};
