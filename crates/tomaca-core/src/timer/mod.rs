mod config;
mod engine;
pub mod progress;
mod session;

pub use config::TimerConfiguration;
pub use engine::SessionMachine;
pub use session::{Phase, TimerState, WorkSession};
