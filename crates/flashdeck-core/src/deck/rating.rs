//! Recall ratings and the rating history log.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A learner's self-assessment of how well a card was recalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Perfect,
    Good,
    Bad,
    None,
}

/// Lockout applied after each rating, in milliseconds.
const LOCKOUT_TABLE: [(Rating, i64); 4] = [
    (Rating::Perfect, 24 * 60 * 60 * 1000),
    (Rating::Good, 60 * 60 * 1000),
    (Rating::Bad, 60 * 1000),
    (Rating::None, 0),
];

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Perfect, Rating::Good, Rating::Bad, Rating::None];

    pub fn lockout_ms(self) -> i64 {
        LOCKOUT_TABLE
            .iter()
            .find(|(rating, _)| *rating == self)
            .map(|(_, ms)| *ms)
            .unwrap_or(0)
    }

    /// How long a card stays blocked after receiving this rating.
    pub fn lockout(self) -> Duration {
        Duration::milliseconds(self.lockout_ms())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Perfect => "perfect",
            Rating::Good => "good",
            Rating::Bad => "bad",
            Rating::None => "none",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = ValidationError;

    /// Accepts the full name or its first letter, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "perfect" | "p" => Ok(Rating::Perfect),
            "good" | "g" => Ok(Rating::Good),
            "bad" | "b" => Ok(Rating::Bad),
            "none" | "n" => Ok(Rating::None),
            _ => Err(ValidationError::UnknownRating(s.trim().to_string())),
        }
    }
}

/// One entry of the append-only rating history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingEvent {
    pub deck_id: String,
    pub card_id: String,
    pub rating: Rating,
    /// Absent on entries written before timestamps were recorded.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub rated_at: Option<DateTime<Utc>>,
}

impl RatingEvent {
    pub fn new(deck_id: &str, card_id: &str, rating: Rating, at: DateTime<Utc>) -> Self {
        Self {
            deck_id: deck_id.to_string(),
            card_id: card_id.to_string(),
            rating,
            rated_at: Some(at),
        }
    }
}
