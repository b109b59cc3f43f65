use std::io::{self, Write};

use clap::Subcommand;
use flashdeck_core::{AggregateStats, Rating};

use super::{format_time, open_repository, CommandResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Aggregate rating counts
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Rating history, oldest first
    History {
        /// Only show ratings for this deck
        #[arg(long)]
        deck: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Erase rating history and aggregate stats (decks are kept)
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: StatsAction) -> CommandResult {
    let (config, mut repo) = open_repository()?;

    match action {
        StatsAction::Show { json } => {
            let stats = repo.aggregate_stats()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_summary(&mut io::stdout().lock(), &stats)?;
            }
        }
        StatsAction::History { deck, json } => {
            let history: Vec<_> = repo
                .rating_history()?
                .into_iter()
                .filter(|e| deck.as_ref().map_or(true, |d| &e.deck_id == d))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else {
                for event in &history {
                    let when = event
                        .rated_at
                        .map(|at| format_time(&config, at))
                        .unwrap_or_else(|| "-".to_string());
                    println!("{when}  {}  {}  {}", event.deck_id, event.card_id, event.rating);
                }
            }
        }
        StatsAction::Reset { yes } => {
            if !yes {
                return Err("refusing to reset without --yes".into());
            }
            repo.reset_history()?;
            println!("rating history and stats reset");
        }
    }
    Ok(())
}

/// Write totals per rating, as shown at the end of a session.
pub fn print_summary(out: &mut impl Write, stats: &AggregateStats) -> io::Result<()> {
    writeln!(out, "Total answered: {}", stats.total)?;
    for rating in Rating::ALL {
        writeln!(
            out,
            "  {:<8} {:>5}  ({:.0}%)",
            rating.as_str(),
            stats.count(rating),
            stats.ratio(rating) * 100.0
        )?;
    }
    Ok(())
}
