//! Document-level access to decks, rating history and aggregate stats.
//!
//! Every operation is a read-modify-write of one whole document. A key
//! that was never written reads as the empty document.

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{KeyValueStore, AGGREGATE_STATS_KEY, DECKS_KEY, RATING_HISTORY_KEY};
use crate::deck::{Card, Deck, RatingEvent};
use crate::error::{CoreError, Result, ValidationError};
use crate::stats::AggregateStats;

/// Owns load/save of every persisted document.
pub struct Repository<S> {
    store: S,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn read_document<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.store.get(key)? {
            Some(raw) if !raw.trim().is_empty() && raw.trim() != "null" => {
                Ok(serde_json::from_str(&raw)?)
            }
            _ => Ok(T::default()),
        }
    }

    fn write_document<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }

    // ── Decks ────────────────────────────────────────────────────────

    pub fn load_decks(&self) -> Result<Vec<Deck>> {
        self.read_document(DECKS_KEY)
    }

    pub fn save_decks(&mut self, decks: &[Deck]) -> Result<()> {
        self.write_document(DECKS_KEY, decks)
    }

    /// Look up a deck; `None` when it does not exist.
    pub fn find_deck(&self, deck_id: &str) -> Result<Option<Deck>> {
        Ok(self.load_decks()?.into_iter().find(|d| d.id == deck_id))
    }

    pub fn create_deck(&mut self, name: &str) -> Result<Deck> {
        let deck = Deck::new(non_blank(name, "name")?);
        let mut decks = self.load_decks()?;
        decks.push(deck.clone());
        self.save_decks(&decks)?;
        info!("created deck {} ({})", deck.id, deck.name);
        Ok(deck)
    }

    pub fn rename_deck(&mut self, deck_id: &str, name: &str) -> Result<Deck> {
        let name = non_blank(name, "name")?;
        self.modify_deck(deck_id, |deck| {
            deck.name = name;
            Ok(deck.clone())
        })
    }

    /// Remove a deck and its cards. Rating history is left untouched.
    pub fn delete_deck(&mut self, deck_id: &str) -> Result<Deck> {
        let mut decks = self.load_decks()?;
        let pos = decks
            .iter()
            .position(|d| d.id == deck_id)
            .ok_or_else(|| CoreError::DeckNotFound(deck_id.to_string()))?;
        let removed = decks.remove(pos);
        self.save_decks(&decks)?;
        info!("deleted deck {} ({} cards)", removed.id, removed.cards.len());
        Ok(removed)
    }

    // ── Cards ────────────────────────────────────────────────────────

    pub fn add_card(&mut self, deck_id: &str, question: &str, answer: &str) -> Result<Card> {
        let card = Card::new(non_blank(question, "question")?, non_blank(answer, "answer")?);
        self.modify_deck(deck_id, |deck| {
            deck.cards.push(card.clone());
            Ok(card)
        })
    }

    /// Replace a card's question and answer. Lockout state is kept.
    pub fn update_card(
        &mut self,
        deck_id: &str,
        card_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<Card> {
        let question = non_blank(question, "question")?;
        let answer = non_blank(answer, "answer")?;
        self.modify_deck(deck_id, |deck| {
            let card = deck.card_mut(card_id).ok_or_else(|| CoreError::CardNotFound {
                deck_id: deck_id.to_string(),
                card_id: card_id.to_string(),
            })?;
            card.question = question;
            card.answer = answer;
            Ok(card.clone())
        })
    }

    pub fn delete_card(&mut self, deck_id: &str, card_id: &str) -> Result<Card> {
        self.modify_deck(deck_id, |deck| {
            let pos = deck
                .cards
                .iter()
                .position(|c| c.id == card_id)
                .ok_or_else(|| CoreError::CardNotFound {
                    deck_id: deck_id.to_string(),
                    card_id: card_id.to_string(),
                })?;
            Ok(deck.cards.remove(pos))
        })
    }

    fn modify_deck<T>(
        &mut self,
        deck_id: &str,
        f: impl FnOnce(&mut Deck) -> Result<T>,
    ) -> Result<T> {
        let mut decks = self.load_decks()?;
        let deck = decks
            .iter_mut()
            .find(|d| d.id == deck_id)
            .ok_or_else(|| CoreError::DeckNotFound(deck_id.to_string()))?;
        let out = f(deck)?;
        self.save_decks(&decks)?;
        Ok(out)
    }

    // ── History & stats ──────────────────────────────────────────────

    pub fn rating_history(&self) -> Result<Vec<RatingEvent>> {
        self.read_document(RATING_HISTORY_KEY)
    }

    pub fn aggregate_stats(&self) -> Result<AggregateStats> {
        self.read_document(AGGREGATE_STATS_KEY)
    }

    /// Persist one rating: the card's new lockout state, the appended
    /// history event and the bumped counters, in a single
    /// [`KeyValueStore::set_many`] batch.
    ///
    /// Returns the updated totals, or `None` (writing nothing) when the
    /// deck or card no longer exists.
    pub fn record_rating(
        &mut self,
        rated: &Card,
        event: RatingEvent,
    ) -> Result<Option<AggregateStats>> {
        let mut decks = self.load_decks()?;
        let Some(slot) = decks
            .iter_mut()
            .find(|d| d.id == event.deck_id)
            .and_then(|d| d.card_mut(&rated.id))
        else {
            return Ok(None);
        };
        slot.last_answered_at = rated.last_answered_at;
        slot.blocked_until = rated.blocked_until;

        let mut stats = self.aggregate_stats()?;
        stats.record(event.rating);
        let mut history = self.rating_history()?;
        let deck_id = event.deck_id.clone();
        history.push(event);

        self.store.set_many(&[
            (DECKS_KEY, serde_json::to_string(&decks)?),
            (RATING_HISTORY_KEY, serde_json::to_string(&history)?),
            (AGGREGATE_STATS_KEY, serde_json::to_string(&stats)?),
        ])?;
        debug!("recorded rating of card {} in deck {deck_id}", rated.id);
        Ok(Some(stats))
    }

    /// Clear rating history and aggregate stats. Decks are kept.
    pub fn reset_history(&mut self) -> Result<()> {
        self.store.remove(RATING_HISTORY_KEY)?;
        self.store.remove(AGGREGATE_STATS_KEY)?;
        info!("rating history and aggregate stats reset");
        Ok(())
    }
}

fn non_blank(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(field).into());
    }
    Ok(trimmed.to_string())
}
