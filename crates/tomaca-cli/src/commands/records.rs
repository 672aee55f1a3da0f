use clap::Subcommand;
use tomaca_core::format::work_list_strings;

use super::timer::load_machine;

#[derive(Subcommand)]
pub enum RecordsAction {
    /// List accumulated work time per day
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all day records
    Clear,
}

pub fn run(action: RecordsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut machine = load_machine()?;

    match action {
        RecordsAction::List { json } => {
            let records = work_list_strings(machine.storage().work_list());
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("no records");
            } else {
                for w in records {
                    println!("{}  {}  {}", w.date, w.time, w.task);
                }
            }
        }
        RecordsAction::Clear => {
            machine.clear_work_list();
            println!("records cleared");
        }
    }
    Ok(())
}
