use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deck::Rating;
use crate::session::{SessionOutcome, SessionState};
use crate::stats::SessionSummary;

/// Every state change of a study session produces an Event.
/// Front ends render from them; the CLI can stream them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        deck_id: String,
        available: usize,
        at: DateTime<Utc>,
    },
    /// The deck had nothing to study; the session never started.
    SessionUnavailable {
        deck_id: String,
        outcome: SessionOutcome,
        at: DateTime<Utc>,
    },
    CardPresented {
        deck_id: String,
        card_id: String,
        /// Zero-based position within the session's available cards.
        position: usize,
        of: usize,
        at: DateTime<Utc>,
    },
    CardRated {
        deck_id: String,
        card_id: String,
        rating: Rating,
        blocked_until: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        deck_id: String,
        summary: SessionSummary,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        deck_id: String,
        state: SessionState,
        position: Option<usize>,
        of: usize,
        summary: SessionSummary,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::SessionStarted { at, .. }
            | Event::SessionUnavailable { at, .. }
            | Event::CardPresented { at, .. }
            | Event::CardRated { at, .. }
            | Event::SessionCompleted { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}
