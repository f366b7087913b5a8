//! Scripted replay of a typing session.
//!
//! # Responsibility
//! - Drive `cadence_core` end to end with a fixed keystroke script.
//! - Print each committed entry's header, pause spacing and styled runs.
//!
//! Usage: `cadence_cli [width|opacity|wave|spacing]`. Set `CADENCE_LOG_DIR`
//! to an absolute path to write logs.

use cadence_core::{
    core_version, default_log_level, init_logging, CadenceConfig, Clock, CommitOutcome,
    FormatCycler, InMemoryPreferenceStore, Journal, ManualClock, PresentationMode,
};

enum Step {
    Type(&'static str, i64),
    Backspace(i64),
    Newline(i64),
    Commit(i64),
}

/// Keystrokes with the delay before each, in milliseconds.
const SCRIPT: &[Step] = &[
    Step::Type("quick", 60),
    Step::Type(" ", 90),
    Step::Type("and slow", 260),
    Step::Commit(400),
    Step::Type("second", 2_000),
    Step::Backspace(150),
    Step::Backspace(120),
    Step::Type("nd", 180),
    Step::Newline(300),
    Step::Type("thought", 110),
    Step::Commit(500),
];

fn main() {
    let mode = match std::env::args().nth(1) {
        Some(raw) => match PresentationMode::parse(&raw) {
            Some(mode) => mode,
            None => {
                eprintln!("unknown mode `{raw}`; expected width|opacity|wave|spacing");
                std::process::exit(2);
            }
        },
        None => PresentationMode::Width,
    };

    if let Ok(log_dir) = std::env::var("CADENCE_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("cadence_core version={}", core_version());
    println!("mode={}", mode.as_str());

    let config = CadenceConfig {
        initial_mode: mode,
        utc_offset_minutes: Some(0),
        ..CadenceConfig::default()
    };
    let clock = ManualClock::starting_at(1_767_621_789_000);
    let mut journal = match Journal::new(config, clock.now_ms()) {
        Ok(journal) => journal,
        Err(err) => {
            eprintln!("invalid config: {err}");
            std::process::exit(1);
        }
    };

    for step in SCRIPT {
        let outcome = match step {
            Step::Type(text, delay) => {
                advance(&mut journal, &clock, *delay);
                type_chars(&mut journal, &clock, text)
            }
            Step::Backspace(delay) => {
                advance(&mut journal, &clock, *delay);
                journal.surface_mut().delete_backward();
                journal.handle_input(clock.now_ms()).map(|_| ())
            }
            Step::Newline(delay) => {
                advance(&mut journal, &clock, *delay);
                journal.surface_mut().type_text("\n");
                journal.handle_input(clock.now_ms()).map(|_| ())
            }
            Step::Commit(delay) => {
                advance(&mut journal, &clock, *delay);
                if let CommitOutcome::Ignored = journal.commit(clock.now_ms()) {
                    println!("commit ignored: blank line");
                }
                Ok(())
            }
        };
        if let Err(err) = outcome {
            eprintln!("replay failed: {err}");
            std::process::exit(1);
        }
    }

    let store = InMemoryPreferenceStore::new();
    let formats = FormatCycler::new(&store, Some(0));
    for entry in journal.entries().iter().filter(|entry| entry.is_committed()) {
        let Ok(header) = journal.header(entry.id(), clock.now_ms(), &formats) else {
            continue;
        };
        println!();
        if let Some(date) = header.date {
            println!("{date}");
        }
        println!(
            "{}  pause={}ms spacing={:.1}",
            header.time,
            entry.pause_duration_ms().unwrap_or(0),
            entry.pause_offset()
        );
        if let Ok(runs) = journal.runs_for(entry.id()) {
            for run in runs {
                println!("  {:?} {}", run.content, run.style.css());
            }
        }
    }
}

/// Moves the clock forward in timer-sized steps so ticks interleave.
fn advance(journal: &mut Journal, clock: &ManualClock, delay_ms: i64) {
    let step = i64::try_from(journal.config().spacing_tick_ms).unwrap_or(50);
    let mut remaining = delay_ms;
    while remaining > 0 {
        let slice = remaining.min(step);
        clock.advance(slice);
        remaining -= slice;
        journal.tick(clock.now_ms());
    }
}

fn type_chars(
    journal: &mut Journal,
    clock: &ManualClock,
    text: &str,
) -> Result<(), cadence_core::JournalError> {
    let mut first = true;
    for ch in text.chars() {
        if !first {
            advance(journal, clock, 70);
        }
        first = false;
        journal.surface_mut().type_text(ch.encode_utf8(&mut [0; 4]));
        journal.handle_input(clock.now_ms())?;
    }
    Ok(())
}
