use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod cue;

#[derive(Parser)]
#[command(name = "pomotick", version, about = "Pomodoro timer in the terminal")]
struct Cli {
    /// Directory holding settings and history (default: ~/.config/pomotick)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timer interactively, reading commands from stdin
    Run,
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Completed session history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = commands::open_store(cli.data_dir).and_then(|store| match cli.command {
        Commands::Run => commands::run::run(store),
        Commands::Config { action } => commands::config::run(action, store),
        Commands::History { action } => commands::history::run(action, store),
        Commands::Stats { action } => commands::stats::run(action, store),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
