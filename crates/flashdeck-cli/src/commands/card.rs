//! Card management commands for CLI.

use clap::Subcommand;

use super::{open_repository, CommandResult};

#[derive(Subcommand)]
pub enum CardAction {
    /// Add a card to a deck
    Add {
        /// Deck ID
        deck_id: String,
        /// Question text
        question: String,
        /// Answer text
        answer: String,
    },
    /// Edit a card's question and/or answer
    Edit {
        /// Deck ID
        deck_id: String,
        /// Card ID
        card_id: String,
        /// New question
        #[arg(long)]
        question: Option<String>,
        /// New answer
        #[arg(long)]
        answer: Option<String>,
    },
    /// Delete a card
    Delete {
        /// Deck ID
        deck_id: String,
        /// Card ID
        card_id: String,
    },
}

pub fn run(action: CardAction) -> CommandResult {
    let (_config, mut repo) = open_repository()?;

    match action {
        CardAction::Add {
            deck_id,
            question,
            answer,
        } => {
            let card = repo.add_card(&deck_id, &question, &answer)?;
            println!("Card added: {}", card.id);
        }
        CardAction::Edit {
            deck_id,
            card_id,
            question,
            answer,
        } => {
            if question.is_none() && answer.is_none() {
                return Err("nothing to change: pass --question and/or --answer".into());
            }
            let deck = repo
                .find_deck(&deck_id)?
                .ok_or_else(|| format!("deck not found: {deck_id}"))?;
            let current = deck
                .card(&card_id)
                .ok_or_else(|| format!("card not found: {card_id}"))?;
            let question = question.unwrap_or_else(|| current.question.clone());
            let answer = answer.unwrap_or_else(|| current.answer.clone());

            let card = repo.update_card(&deck_id, &card_id, &question, &answer)?;
            println!("Card updated: {}", card.id);
        }
        CardAction::Delete { deck_id, card_id } => {
            let card = repo.delete_card(&deck_id, &card_id)?;
            println!("Card deleted: {}", card.id);
        }
    }
    Ok(())
}
