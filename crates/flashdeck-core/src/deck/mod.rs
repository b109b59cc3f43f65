//! Decks, cards and ratings.
//!
//! These are the documents persisted under the `decks` and
//! `ratingHistory` keys. Field names follow the stored JSON (camelCase)
//! and timestamps are epoch milliseconds.

mod rating;

pub use rating::{Rating, RatingEvent};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A question/answer pair and its lockout state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_answered_at: Option<DateTime<Utc>>,
    /// When present, always at or after `last_answered_at`.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub blocked_until: Option<DateTime<Utc>>,
}

impl Card {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question: question.into(),
            answer: answer.into(),
            last_answered_at: None,
            blocked_until: None,
        }
    }

    /// True when the card may be presented at `now`.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        match self.blocked_until {
            None => true,
            Some(until) => until <= now,
        }
    }

    pub fn status(&self, now: DateTime<Utc>) -> CardStatus {
        match self.blocked_until {
            Some(until) if until > now => CardStatus::Blocked { until },
            _ => CardStatus::Available,
        }
    }

    /// Whether the card has ever been rated.
    pub fn is_new(&self) -> bool {
        self.last_answered_at.is_none()
    }
}

/// Availability of a card at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CardStatus {
    Available,
    Blocked {
        #[serde(with = "chrono::serde::ts_milliseconds")]
        until: DateTime<Utc>,
    },
}

/// A named, ordered collection of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            cards: Vec::new(),
        }
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn card_mut(&mut self, card_id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == card_id)
    }

    /// Number of cards presentable at `now`.
    pub fn available_count(&self, now: DateTime<Utc>) -> usize {
        self.cards.iter().filter(|c| c.is_available(now)).count()
    }
}
