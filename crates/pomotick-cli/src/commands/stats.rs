use chrono::Local;
use clap::Subcommand;
use pomotick_core::stats::{cycle_position, today_stats};
use pomotick_core::{FileStore, Persistence};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's pomodoros, focus minutes and breaks
    Today {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction, store: FileStore) -> Result<(), Box<dyn std::error::Error>> {
    let state = Persistence::new(store).load();
    match action {
        StatsAction::Today { json } => {
            let today = today_stats(&state.history, &Local::now());
            if json {
                let mut value = serde_json::to_value(today)?;
                value["completed_count"] = state.completed.into();
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let interval = state.settings.long_break_interval();
                let filled = cycle_position(state.completed, interval);
                let markers: String = (0..interval)
                    .map(|i| if i < filled { '●' } else { '○' })
                    .collect();
                println!("Pomodoros:     {}", today.pomodoros);
                println!("Focus minutes: {}", today.focus_minutes);
                println!("Breaks taken:  {}", today.breaks);
                println!("{markers} {} pomodoros completed", state.completed);
            }
        }
    }
    Ok(())
}
