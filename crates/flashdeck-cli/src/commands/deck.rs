//! Deck management commands for CLI.

use clap::Subcommand;
use flashdeck_core::{CardStatus, Clock, Deck, SystemClock};
use serde::Serialize;

use super::{format_time, open_repository, CommandResult};

#[derive(Subcommand)]
pub enum DeckAction {
    /// List decks
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Create a new deck
    Create {
        /// Deck name
        name: String,
    },
    /// Rename a deck
    Rename {
        /// Deck ID
        id: String,
        /// New name
        name: String,
    },
    /// Delete a deck and all of its cards
    Delete {
        /// Deck ID
        id: String,
    },
    /// Show a deck's cards and whether each is available
    Show {
        /// Deck ID
        id: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeckListing<'a> {
    id: &'a str,
    name: &'a str,
    cards: usize,
    available: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardListing<'a> {
    id: &'a str,
    question: &'a str,
    answer: &'a str,
    #[serde(flatten)]
    status: CardStatus,
}

pub fn run(action: DeckAction) -> CommandResult {
    let (config, mut repo) = open_repository()?;
    let now = SystemClock.now();

    match action {
        DeckAction::List { json } => {
            let decks = repo.load_decks()?;
            let listing: Vec<DeckListing> = decks.iter().map(|d| listing(d, now)).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else if listing.is_empty() {
                println!("No decks yet. Create one with `flashdeck deck create <name>`.");
            } else {
                for deck in &listing {
                    println!(
                        "{}  {}  ({} cards, {} available)",
                        deck.id, deck.name, deck.cards, deck.available
                    );
                }
            }
        }
        DeckAction::Create { name } => {
            let deck = repo.create_deck(&name)?;
            println!("Deck created: {}", deck.id);
        }
        DeckAction::Rename { id, name } => {
            let deck = repo.rename_deck(&id, &name)?;
            println!("Deck renamed: {} -> {}", deck.id, deck.name);
        }
        DeckAction::Delete { id } => {
            let deck = repo.delete_deck(&id)?;
            println!("Deck deleted: {} ({} cards)", deck.name, deck.cards.len());
        }
        DeckAction::Show { id, json } => {
            let deck = repo
                .find_deck(&id)?
                .ok_or_else(|| format!("deck not found: {id}"))?;
            let cards: Vec<CardListing> = deck
                .cards
                .iter()
                .map(|c| CardListing {
                    id: &c.id,
                    question: &c.question,
                    answer: &c.answer,
                    status: c.status(now),
                })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&cards)?);
            } else {
                println!("{} ({})", deck.name, deck.id);
                if cards.is_empty() {
                    println!("  no cards");
                }
                for card in &cards {
                    let status = match card.status {
                        CardStatus::Available => "available".to_string(),
                        CardStatus::Blocked { until } => {
                            format!("blocked until {}", format_time(&config, until))
                        }
                    };
                    println!("  {}  {} -> {}  [{status}]", card.id, card.question, card.answer);
                }
            }
        }
    }
    Ok(())
}

fn listing(deck: &Deck, now: chrono::DateTime<chrono::Utc>) -> DeckListing<'_> {
    DeckListing {
        id: &deck.id,
        name: &deck.name,
        cards: deck.cards.len(),
        available: deck.available_count(now),
    }
}
