//! Interactive foreground timer.
//!
//! One current-thread runtime drives everything: ticks from the
//! [`IntervalTicker`] and command lines from stdin are handled in turn by
//! a single loop that owns the engine, so nothing mutates it concurrently.

use std::io::ErrorKind;

use pomotick_core::stats::format_clock;
use pomotick_core::storage::{parse_duration_input, parse_flag_input, parse_interval_input};
use pomotick_core::{
    CoreError, Event, FileStore, IntervalTicker, KeyValueStore, Mode, SoundCue, TickSource,
    TimerEngine,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tracing::warn;

use crate::cue::TerminalBell;

const HELP: &str = "commands: start | pause | toggle | reset | work | short | long | \
set <key> <value> | status | clear | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Toggle,
    Reset,
    Switch(Mode),
    Set { key: String, value: String },
    Status,
    Clear,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let command = match verb.to_ascii_lowercase().as_str() {
        "start" => Command::Start,
        "pause" => Command::Pause,
        "toggle" | "t" => Command::Toggle,
        "reset" => Command::Reset,
        "work" | "focus" => Command::Switch(Mode::Work),
        "short" => Command::Switch(Mode::ShortBreak),
        "long" => Command::Switch(Mode::LongBreak),
        "status" => Command::Status,
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "set" => {
            let key = words.next().ok_or("usage: set <key> <value>")?;
            let value = words.collect::<Vec<_>>().join(" ");
            Command::Set {
                key: key.to_string(),
                value,
            }
        }
        other => return Err(format!("unknown command: {other} ({HELP})")),
    };
    Ok(Some(command))
}

/// Apply a parsed command to the engine.
pub fn apply<K, T, C>(
    engine: &mut TimerEngine<K, T, C>,
    command: Command,
) -> Result<Option<Event>, CoreError>
where
    K: KeyValueStore,
    T: TickSource,
    C: SoundCue,
{
    let event = match command {
        Command::Start => engine.start(),
        Command::Pause => engine.pause(),
        Command::Toggle => engine.toggle(),
        Command::Reset => engine.reset(),
        Command::Switch(mode) => engine.switch_mode(mode),
        Command::Set { key, value } => return set(engine, &key, &value),
        Command::Status => Some(engine.snapshot()),
        Command::Clear => engine.clear_history(),
        Command::Help | Command::Quit => None,
    };
    Ok(event)
}

fn set<K, T, C>(
    engine: &mut TimerEngine<K, T, C>,
    key: &str,
    value: &str,
) -> Result<Option<Event>, CoreError>
where
    K: KeyValueStore,
    T: TickSource,
    C: SoundCue,
{
    let duration_mode = match key {
        "workDuration" => Some(Mode::Work),
        "shortBreakDuration" => Some(Mode::ShortBreak),
        "longBreakDuration" => Some(Mode::LongBreak),
        _ => None,
    };
    if let Some(mode) = duration_mode {
        return Ok(engine.set_duration(mode, parse_duration_input(mode, value)));
    }

    match key {
        "longBreakInterval" => engine.set_long_break_interval(parse_interval_input(value)),
        "autoStartBreaks" => engine.set_auto_start_breaks(parse_flag(key, value)?),
        "autoStartWork" => engine.set_auto_start_work(parse_flag(key, value)?),
        "soundEnabled" => engine.set_sound_enabled(parse_flag(key, value)?),
        _ => {
            return Err(CoreError::InvalidSetting {
                key: key.to_string(),
                message: "unknown key".into(),
            })
        }
    }
    Ok(None)
}

fn parse_flag(key: &str, value: &str) -> Result<bool, CoreError> {
    parse_flag_input(value).ok_or_else(|| CoreError::InvalidSetting {
        key: key.to_string(),
        message: format!("expected true or false, got '{}'", value.trim()),
    })
}

/// Clock face line, e.g. `24:59  Focus Time  [running]`.
pub fn face<K, T, C>(engine: &TimerEngine<K, T, C>) -> String
where
    K: KeyValueStore,
    T: TickSource,
    C: SoundCue,
{
    let status = if engine.is_running() { "running" } else { "paused" };
    format!(
        "{}  {}  [{status}]",
        format_clock(engine.remaining_secs()),
        engine.mode().label()
    )
}

/// Handle one tick delivered by the ticker, returning the lines to print.
///
/// Ticks from a subscription the engine has since disarmed produce nothing.
pub fn on_tick<K, C>(
    engine: &mut TimerEngine<K, IntervalTicker, C>,
    generation: u64,
) -> Result<Vec<String>, serde_json::Error>
where
    K: KeyValueStore,
    C: SoundCue,
{
    if !engine.ticker().accepts(generation) {
        return Ok(Vec::new());
    }
    let mut lines = Vec::with_capacity(2);
    if let Some(event) = engine.tick() {
        lines.push(serde_json::to_string(&event)?);
    }
    lines.push(face(&*engine));
    Ok(lines)
}

pub fn run(store: FileStore) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_loop(store))
}

async fn run_loop(store: FileStore) -> Result<(), Box<dyn std::error::Error>> {
    let (ticker, mut ticks) = IntervalTicker::new(Handle::current());
    let mut engine = TimerEngine::load(store, ticker, TerminalBell::stdout());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", face(&engine));
    loop {
        tokio::select! {
            Some(generation) = ticks.recv() => {
                for line in on_tick(&mut engine, generation)? {
                    println!("{line}");
                }
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) if e.kind() == ErrorKind::InvalidData => {
                        warn!(error = %e, "skipping unreadable input line");
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => println!("{HELP}"),
                    Ok(Some(command)) => match apply(&mut engine, command) {
                        Ok(Some(event)) => {
                            println!("{}", serde_json::to_string(&event)?);
                            println!("{}", face(&engine));
                        }
                        Ok(None) => println!("{}", face(&engine)),
                        Err(e) => warn!(error = %e, "command rejected"),
                    },
                    Err(msg) => eprintln!("{msg}"),
                }
            }
        }
    }

    engine.pause();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomotick_core::storage::SETTINGS_KEY;
    use pomotick_core::{ManualTicker, MemoryStore, SilentCue};

    fn engine() -> TimerEngine<MemoryStore, ManualTicker, SilentCue> {
        TimerEngine::load(MemoryStore::new(), ManualTicker::new(), SilentCue)
    }

    #[test]
    fn parses_verbs_and_aliases() {
        assert_eq!(parse_command("start"), Ok(Some(Command::Start)));
        assert_eq!(parse_command("  T "), Ok(Some(Command::Toggle)));
        assert_eq!(parse_command("short"), Ok(Some(Command::Switch(Mode::ShortBreak))));
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command(""), Ok(None));
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn parses_set_with_value() {
        assert_eq!(
            parse_command("set workDuration 30"),
            Ok(Some(Command::Set {
                key: "workDuration".into(),
                value: "30".into()
            }))
        );
        assert!(parse_command("set").is_err());
    }

    #[test]
    fn set_duration_goes_through_input_coercion() {
        let mut engine = engine();
        apply(
            &mut engine,
            Command::Set {
                key: "workDuration".into(),
                value: "abc".into(),
            },
        )
        .unwrap();
        assert_eq!(engine.settings().work_duration, 25);

        apply(
            &mut engine,
            Command::Set {
                key: "workDuration".into(),
                value: "45".into(),
            },
        )
        .unwrap();
        assert_eq!(engine.remaining_secs(), 45 * 60);
    }

    #[test]
    fn set_flags_and_rejects_unknown_keys() {
        let mut engine = engine();
        apply(
            &mut engine,
            Command::Set {
                key: "soundEnabled".into(),
                value: "false".into(),
            },
        )
        .unwrap();
        assert!(!engine.settings().sound_enabled);

        apply(
            &mut engine,
            Command::Set {
                key: "longBreakInterval".into(),
                value: "3".into(),
            },
        )
        .unwrap();
        assert_eq!(engine.settings().long_break_interval, 3);

        let bad_flag = apply(
            &mut engine,
            Command::Set {
                key: "autoStartWork".into(),
                value: "sometimes".into(),
            },
        );
        assert!(bad_flag.is_err());

        let result = apply(
            &mut engine,
            Command::Set {
                key: "volume".into(),
                value: "3".into(),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn status_is_a_snapshot() {
        let mut engine = engine();
        let event = apply(&mut engine, Command::Status).unwrap();
        assert!(matches!(event, Some(Event::StateSnapshot { .. })));
    }

    #[test]
    fn face_shows_clock_and_mode() {
        let mut engine = engine();
        assert_eq!(face(&engine), "25:00  Focus Time  [paused]");
        apply(&mut engine, Command::Switch(Mode::LongBreak)).unwrap();
        apply(&mut engine, Command::Start).unwrap();
        assert_eq!(face(&engine), "15:00  Long Break  [running]");
    }

    fn one_minute_engine() -> (
        TimerEngine<MemoryStore, IntervalTicker, SilentCue>,
        tokio::sync::mpsc::UnboundedReceiver<u64>,
    ) {
        let store = MemoryStore::with_entries([(SETTINGS_KEY, r#"{"workDuration":1}"#)]);
        let (ticker, ticks) = IntervalTicker::new(Handle::current());
        (TimerEngine::load(store, ticker, SilentCue), ticks)
    }

    #[tokio::test(start_paused = true)]
    async fn live_ticks_count_down_and_print_the_face() {
        let (mut engine, mut ticks) = one_minute_engine();
        engine.start();

        let generation = ticks.recv().await.unwrap();
        let lines = on_tick(&mut engine, generation).unwrap();
        assert_eq!(lines, vec!["00:59  Focus Time  [running]".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_tick_prints_the_session_event() {
        let (mut engine, _ticks) = one_minute_engine();
        engine.start();
        let generation = engine.ticker().generation();

        for _ in 0..59 {
            on_tick(&mut engine, generation).unwrap();
        }
        let lines = on_tick(&mut engine, generation).unwrap();
        assert_eq!(lines.len(), 2);
        let event: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(event["type"], "SessionCompleted");
        assert_eq!(lines[1], "05:00  Short Break  [paused]");
        assert_eq!(engine.completed_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_from_before_a_reset_are_dropped() {
        let (mut engine, _ticks) = one_minute_engine();
        engine.start();
        let stale = engine.ticker().generation();

        engine.reset();
        engine.start();
        assert!(on_tick(&mut engine, stale).unwrap().is_empty());
        assert_eq!(engine.remaining_secs(), 60);

        let live = engine.ticker().generation();
        assert_eq!(on_tick(&mut engine, live).unwrap().len(), 1);
        assert_eq!(engine.remaining_secs(), 59);
    }
}
