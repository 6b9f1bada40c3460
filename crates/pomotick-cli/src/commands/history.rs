use chrono::{Local, TimeZone};
use clap::Subcommand;
use pomotick_core::stats::recent;
use pomotick_core::{FileStore, ManualTicker, Persistence, Session, SilentCue, TimerEngine};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List recent sessions, newest first
    List {
        /// Number of sessions to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all sessions and reset the pomodoro count
    Clear,
}

pub fn run(action: HistoryAction, store: FileStore) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        HistoryAction::List { limit, json } => {
            let history = Persistence::new(store).load_history();
            let sessions = recent(&history, limit);
            if json {
                println!("{}", serde_json::to_string_pretty(sessions)?);
            } else if history.is_empty() {
                println!("No sessions yet. Start your first pomodoro!");
            } else {
                for session in sessions {
                    println!("{}", format_session(session));
                }
            }
        }
        HistoryAction::Clear => {
            // Offline engine: nothing ticks, it only performs the clear.
            let mut engine = TimerEngine::load(store, ManualTicker::new(), SilentCue);
            engine.clear_history();
            println!("history cleared");
        }
    }
    Ok(())
}

fn format_session(session: &Session) -> String {
    let when = Local
        .timestamp_millis_opt(session.completed_at)
        .single()
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "????-??-?? ??:??".to_string());
    format!(
        "{when}  {:<14} {} min",
        session.mode.history_label(),
        session.duration_min()
    )
}
