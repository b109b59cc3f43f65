//! Interactive study session.
//!
//! Reads from stdin one line at a time. In text mode each card waits for
//! Enter before the answer is shown (unless `session.reveal_answer` is
//! set), then asks for a rating. `q` ends the session early.
//!
//! With `--json` no prompts are printed: every session event is written as
//! one JSON line and each input line is taken as a rating.

use std::io::{self, BufRead, Write};

use clap::Args;
use flashdeck_core::{
    Clock, Event, KeyValueStore, Rating, Scheduler, Session, SessionStart, SessionState,
    SystemClock,
};
use log::debug;

use super::stats::print_summary;
use super::{open_repository, CommandResult};

#[derive(Args)]
pub struct StudyArgs {
    /// Deck ID
    pub deck_id: String,
    /// Emit session events as JSON lines and read bare ratings
    #[arg(long)]
    pub json: bool,
    /// Show answers immediately (overrides session.reveal_answer)
    #[arg(long)]
    pub reveal: bool,
}

/// Presentation options for one run.
#[derive(Debug, Clone, Copy)]
pub struct StudyOptions {
    pub json: bool,
    pub reveal_answer: bool,
    pub show_progress: bool,
}

pub fn run(args: StudyArgs) -> CommandResult {
    let (config, repo) = open_repository()?;
    let mut scheduler = Scheduler::new(repo, SystemClock);
    let options = StudyOptions {
        json: args.json,
        reveal_answer: args.reveal || config.session.reveal_answer,
        show_progress: config.session.show_progress,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    study(&mut scheduler, &args.deck_id, options, stdin.lock(), stdout.lock())?;
    Ok(())
}

enum Line {
    Text(String),
    Quit,
}

fn read_line(input: &mut impl BufRead) -> io::Result<Line> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(Line::Quit);
    }
    let trimmed = buf.trim();
    if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
        return Ok(Line::Quit);
    }
    Ok(Line::Text(trimmed.to_string()))
}

fn emit(out: &mut impl Write, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    writeln!(out, "{}", serde_json::to_string(event)?)?;
    Ok(())
}

/// Run one session to completion or until the user quits.
///
/// Returns the session's final state (`None` when it never started).
pub fn study<S, C>(
    scheduler: &mut Scheduler<S, C>,
    deck_id: &str,
    options: StudyOptions,
    mut input: impl BufRead,
    mut out: impl Write,
) -> Result<Option<SessionState>, Box<dyn std::error::Error>>
where
    S: KeyValueStore,
    C: Clock,
{
    let mut session: Session = match scheduler.start_session(deck_id)? {
        SessionStart::Started { session, events } => {
            if options.json {
                for event in &events {
                    emit(&mut out, event)?;
                }
            }
            session
        }
        SessionStart::Unavailable { outcome, event } => {
            if options.json {
                emit(&mut out, &event)?;
            } else {
                writeln!(out, "Nothing to study: {}.", outcome.describe())?;
            }
            return Ok(None);
        }
    };

    while let Some(card) = session.current_card().cloned() {
        if !options.json {
            writeln!(out)?;
            if options.show_progress {
                let position = session.position().map_or(0, |p| p + 1);
                writeln!(out, "Card {position} of {}", session.len())?;
            }
            writeln!(out, "Q: {}", card.question)?;
            if !options.reveal_answer {
                write!(out, "(press Enter to show the answer) ")?;
                out.flush()?;
                if let Line::Quit = read_line(&mut input)? {
                    break;
                }
            }
            writeln!(out, "A: {}", card.answer)?;
        }

        let rating = loop {
            if !options.json {
                write!(out, "Rate [p]erfect [g]ood [b]ad [n]one, q to quit: ")?;
                out.flush()?;
            }
            match read_line(&mut input)? {
                Line::Quit => break None,
                Line::Text(text) => match text.parse::<Rating>() {
                    Ok(rating) => break Some(rating),
                    Err(e) => {
                        debug!("rejected rating input: {e}");
                        if !options.json {
                            writeln!(out, "{e}")?;
                        }
                    }
                },
            }
        };
        let Some(rating) = rating else {
            break;
        };

        for event in scheduler.rate(&mut session, rating)? {
            if options.json {
                emit(&mut out, &event)?;
            }
        }
    }

    if options.json {
        emit(&mut out, &session.snapshot(scheduler.now()))?;
    } else {
        writeln!(out)?;
        match session.state() {
            SessionState::Completed => writeln!(out, "Session complete.")?,
            _ => writeln!(
                out,
                "Session stopped with {} cards left.",
                session.remaining()
            )?,
        }
        print_summary(&mut out, session.summary())?;
        out.flush()?;
    }
    Ok(Some(session.state()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashdeck_core::{ManualClock, MemoryStore, Repository};
    use std::io::Cursor;

    fn setup(clock: &ManualClock, cards: usize) -> (Scheduler<MemoryStore, &ManualClock>, String) {
        let mut sched = Scheduler::new(Repository::new(MemoryStore::new()), clock);
        let deck = sched.repository_mut().create_deck("Test").unwrap();
        for i in 0..cards {
            sched
                .repository_mut()
                .add_card(&deck.id, &format!("q{i}"), &format!("a{i}"))
                .unwrap();
        }
        (sched, deck.id)
    }

    fn text_options() -> StudyOptions {
        StudyOptions {
            json: false,
            reveal_answer: false,
            show_progress: true,
        }
    }

    #[test]
    fn text_session_runs_to_completion() {
        let clock = ManualClock::at_millis(0);
        let (mut sched, deck_id) = setup(&clock, 2);
        let input = Cursor::new("\nxyz\np\n\ng\n");
        let mut out = Vec::new();

        let state = study(&mut sched, &deck_id, text_options(), input, &mut out).unwrap();

        assert_eq!(state, Some(SessionState::Completed));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Card 1 of 2"));
        assert!(text.contains("A: a1"));
        assert!(text.contains("Unknown rating 'xyz'"));
        assert!(text.contains("Session complete."));
        assert!(text.contains("Total answered: 2"));
        assert!(text.contains("  perfect      1  (50%)"));
        assert_eq!(sched.repository().aggregate_stats().unwrap().total, 2);
    }

    #[test]
    fn quitting_leaves_session_in_progress() {
        let clock = ManualClock::at_millis(0);
        let (mut sched, deck_id) = setup(&clock, 3);
        let input = Cursor::new("\nb\nq\n");
        let mut out = Vec::new();

        let state = study(&mut sched, &deck_id, text_options(), input, &mut out).unwrap();

        assert_eq!(state, Some(SessionState::InProgress));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("2 cards left"));
        assert!(text.contains("Total answered: 1"));
        assert_eq!(sched.repository().rating_history().unwrap().len(), 1);
    }

    #[test]
    fn unavailable_deck_prints_reason() {
        let clock = ManualClock::at_millis(0);
        let (mut sched, deck_id) = setup(&clock, 0);
        let mut out = Vec::new();

        let state = study(&mut sched, &deck_id, text_options(), Cursor::new(""), &mut out).unwrap();

        assert_eq!(state, None);
        assert!(String::from_utf8(out).unwrap().contains("deck has no cards"));
    }

    #[test]
    fn json_mode_streams_events() {
        let clock = ManualClock::at_millis(0);
        let (mut sched, deck_id) = setup(&clock, 1);
        let options = StudyOptions {
            json: true,
            ..text_options()
        };
        let mut out = Vec::new();

        study(&mut sched, &deck_id, options, Cursor::new("perfect\n"), &mut out).unwrap();

        let types: Vec<String> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["type"].to_string())
            .collect();
        assert_eq!(
            types,
            [
                "\"SessionStarted\"",
                "\"CardPresented\"",
                "\"CardRated\"",
                "\"SessionCompleted\"",
                "\"StateSnapshot\"",
            ]
        );
    }
}
