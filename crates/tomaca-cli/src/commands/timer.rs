use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use tomaca_core::storage::Database;
use tomaca_core::{time_string, Config, Event, SessionMachine, StorageController, TimerState};

const STATE_KEY: &str = "timerState";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a new session with its first work interval
    Start {
        /// Task name recorded for the day
        #[arg(long)]
        task: String,
        /// Long break in minutes (defaults to the last one used)
        #[arg(long)]
        long_break: Option<i64>,
    },
    /// End the current work interval and take a break
    Pause {
        /// Seconds left on the work countdown
        #[arg(long, default_value = "0")]
        remaining: i64,
        /// The interval ran to completion
        #[arg(long)]
        completed: bool,
    },
    /// End the current break and start the next work interval
    Resume {
        /// Seconds left on the break countdown
        #[arg(long, default_value = "0")]
        remaining: i64,
        /// The break ran to completion
        #[arg(long)]
        completed: bool,
    },
    /// End the long break and record the session
    Finish {
        /// Seconds left on the long break countdown
        #[arg(long, default_value = "0")]
        remaining: i64,
    },
    /// Print current session state as JSON
    Status,
    /// Discard the session and return to idle
    Reset,
    /// Run a full session with a live countdown
    ///
    /// Every phase runs to completion. Use `pause`/`resume`/`finish` with
    /// `--remaining` to record an interval cut short.
    Run {
        #[arg(long)]
        task: String,
        /// Long break in minutes (defaults to the last one used)
        #[arg(long)]
        long_break: Option<i64>,
        /// Milliseconds per countdown second
        #[arg(long, default_value = "1000", hide = true)]
        tick_ms: u64,
    },
}

/// Open the store and rebuild the machine, resuming any parked session.
pub(crate) fn load_machine() -> Result<SessionMachine<Database>, Box<dyn std::error::Error>> {
    let defaults = Config::load_or_default().timer_configuration();
    let db = Database::open()?;
    let storage = StorageController::with_default_long_break(db, defaults.long_break_time);
    let mut machine = SessionMachine::with_defaults(storage, defaults);

    match machine.storage().store().kv_get(STATE_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<TimerState>(&json) {
            Ok(state) => machine.restore(state),
            Err(e) => tracing::warn!("discarding unreadable timer state: {e}"),
        },
        Ok(None) => {}
        Err(e) => tracing::warn!("unable to read timer state: {e}"),
    }
    Ok(machine)
}

fn save_state(machine: &SessionMachine<Database>) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(machine.state())?;
    machine.storage().store().kv_set(STATE_KEY, &json)?;
    Ok(())
}

fn long_break_minutes(machine: &SessionMachine<Database>, requested: Option<i64>) -> i64 {
    requested.unwrap_or(machine.session().timer_config.long_break_time / 60)
}

/// Print a transition event, or fail if the machine ignored the call.
fn emit(
    machine: &SessionMachine<Database>,
    action: &str,
    event: Option<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => {
            println!("{}", serde_json::to_string_pretty(&event)?);
            Ok(())
        }
        None => Err(format!("cannot {action} while {}", machine.state().name()).into()),
    }
}

/// Write countdown text and flush. The countdown is cosmetic, so a failed
/// write is logged once and then ignored.
fn draw(out: &mut impl Write, text: &str, reported: &mut bool) {
    if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        if !*reported {
            tracing::debug!("countdown output failed: {e}");
            *reported = true;
        }
    }
}

/// Count down `seconds` on stderr. Always runs to zero.
fn countdown(label: &str, seconds: i64, tick: Duration) {
    let mut stderr = std::io::stderr();
    let mut reported = false;
    for left in (1..=seconds).rev() {
        draw(&mut stderr, &format!("\r{label} {}", time_string(left)), &mut reported);
        std::thread::sleep(tick);
    }
    draw(&mut stderr, &format!("\r{label} {}\n", time_string(0)), &mut reported);
}

fn run_session(
    machine: &mut SessionMachine<Database>,
    task: String,
    long_break: Option<i64>,
    tick: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    machine.initialize();
    let minutes = long_break_minutes(machine, long_break);
    let event = machine.set_and_start(minutes, task);
    emit(machine, "start", event)?;

    loop {
        let session = machine.session();
        let config = &session.timer_config;
        let (action, title, seconds) = match machine.state() {
            TimerState::Start(_) => ("pause", &config.work_title, config.main_time),
            TimerState::ShortPause(_) => ("resume", &config.break_title, config.short_break_time),
            TimerState::LongPause(_) => ("finish", &config.break_title, config.long_break_time),
            TimerState::Idle | TimerState::Finish(_) => break,
        };
        let label = format!("{title} {}", session.progress);
        countdown(&label, seconds, tick);
        let event = match action {
            "pause" => machine.pause(0, true),
            "resume" => machine.start(0, true),
            _ => machine.finish(0),
        };
        emit(machine, action, event)?;
        save_state(machine)?;
    }

    for w in machine.work_list_string() {
        println!("{}  {}  {}", w.date, w.time, w.task);
    }
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut machine = load_machine()?;

    match action {
        TimerAction::Start { task, long_break } => {
            machine.initialize();
            let minutes = long_break_minutes(&machine, long_break);
            let event = machine.set_and_start(minutes, task);
            emit(&machine, "start", event)?;
        }
        TimerAction::Pause { remaining, completed } => {
            let event = machine.pause(remaining, completed);
            emit(&machine, "pause", event)?;
        }
        TimerAction::Resume { remaining, completed } => {
            let event = machine.start(remaining, completed);
            emit(&machine, "resume", event)?;
        }
        TimerAction::Finish { remaining } => {
            let event = machine.finish(remaining);
            emit(&machine, "finish", event)?;
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&machine.snapshot())?);
        }
        TimerAction::Reset => {
            let event = machine.initialize();
            emit(&machine, "reset", event)?;
        }
        TimerAction::Run { task, long_break, tick_ms } => {
            run_session(&mut machine, task, long_break, Duration::from_millis(tick_ms))?;
        }
    }

    save_state(&machine)?;
    Ok(())
}
