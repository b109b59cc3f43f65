//! Study session state machine.
//!
//! A session is one pass over the cards that were available when it was
//! created. It holds no storage handle; persistence happens in
//! [`super::Scheduler`] before the session is told to move on.
//!
//! ## State Transitions
//!
//! ```text
//! NotStarted -> InProgress -> Completed
//! ```
//!
//! A session whose card list is empty can never leave `NotStarted`.
//! Nothing leaves `Completed`; study again with a fresh session.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::selection::next_card;
use crate::deck::{Card, Rating};
use crate::events::Event;
use crate::stats::SessionSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

/// Why a session could not start. These are normal results, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    DeckNotFound,
    /// The deck exists but holds no cards.
    EmptyDeck,
    /// Every card is blocked at the moment.
    AllBlocked,
}

impl SessionOutcome {
    pub fn describe(self) -> &'static str {
        match self {
            SessionOutcome::DeckNotFound => "deck not found",
            SessionOutcome::EmptyDeck => "deck has no cards",
            SessionOutcome::AllBlocked => "all cards are blocked for now",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    deck_id: String,
    cards: Vec<Card>,
    state: SessionState,
    current: Option<usize>,
    summary: SessionSummary,
}

impl Session {
    /// Create a session over `available`, in the order given.
    pub fn new(deck_id: impl Into<String>, available: Vec<Card>) -> Self {
        Self {
            deck_id: deck_id.into(),
            cards: available,
            state: SessionState::NotStarted,
            current: None,
            summary: SessionSummary::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn deck_id(&self) -> &str {
        &self.deck_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Zero-based index of the card being shown.
    pub fn position(&self) -> Option<usize> {
        self.current
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current.and_then(|i| self.cards.get(i))
    }

    /// Cards not yet rated, including the one being shown.
    pub fn remaining(&self) -> usize {
        match (self.state, self.current) {
            (SessionState::NotStarted, _) => self.cards.len(),
            (SessionState::InProgress, Some(i)) => self.cards.len() - i,
            _ => 0,
        }
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    pub fn snapshot(&self, at: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            deck_id: self.deck_id.clone(),
            state: self.state,
            position: self.current,
            of: self.cards.len(),
            summary: self.summary,
            at,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Present the first card.
    ///
    /// Returns `None` and stays `NotStarted` when there is nothing to show,
    /// or when the session already started.
    pub fn start(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if self.state != SessionState::NotStarted {
            return None;
        }
        let first = next_card(&self.cards, None)?;
        self.state = SessionState::InProgress;
        self.current = Some(first);
        info!("session on deck {} started with {} cards", self.deck_id, self.cards.len());
        Some(self.presented(first, at))
    }

    /// Record the rating of the card being shown and move on.
    ///
    /// `rated` replaces the session's copy of the current card. Returns
    /// the `CardPresented` event for the next card, or `SessionCompleted`
    /// once the pass is over. Returns `None` when no card is being shown.
    pub fn finish_current(
        &mut self,
        rated: Card,
        rating: Rating,
        at: DateTime<Utc>,
    ) -> Option<Event> {
        if self.state != SessionState::InProgress {
            return None;
        }
        let index = self.current?;
        self.summary.record(rating);
        if let Some(slot) = self.cards.get_mut(index) {
            *slot = rated;
        }
        Some(self.advance(at))
    }

    fn advance(&mut self, at: DateTime<Utc>) -> Event {
        match next_card(&self.cards, self.current) {
            Some(next) => {
                self.current = Some(next);
                debug!("session on deck {} advanced to {next}", self.deck_id);
                self.presented(next, at)
            }
            None => {
                self.current = None;
                self.state = SessionState::Completed;
                info!(
                    "session on deck {} completed after {} ratings",
                    self.deck_id, self.summary.total
                );
                Event::SessionCompleted {
                    deck_id: self.deck_id.clone(),
                    summary: self.summary,
                    at,
                }
            }
        }
    }

    fn presented(&self, index: usize, at: DateTime<Utc>) -> Event {
        Event::CardPresented {
            deck_id: self.deck_id.clone(),
            card_id: self.cards[index].id.clone(),
            position: index,
            of: self.cards.len(),
            at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::apply_rating;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn cards(n: usize) -> Vec<Card> {
        (1..=n)
            .map(|i| {
                let mut c = Card::new(format!("q{i}"), format!("a{i}"));
                c.id = i.to_string();
                c
            })
            .collect()
    }

    fn rate_current(session: &mut Session, rating: Rating, now: DateTime<Utc>) -> Option<Event> {
        let card = session.current_card()?.clone();
        session.finish_current(apply_rating(&card, rating, now), rating, now)
    }

    #[test]
    fn empty_session_never_starts() {
        let mut session = Session::new("d", Vec::new());
        assert!(session.start(at(0)).is_none());
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(rate_current(&mut session, Rating::Good, at(0)).is_none());
        assert_eq!(session.summary().total, 0);
    }

    #[test]
    fn four_cards_complete_after_fourth_rating() {
        let mut session = Session::new("d", cards(4));
        assert!(matches!(session.start(at(0)), Some(Event::CardPresented { position: 0, .. })));

        for i in 0..3 {
            let event = rate_current(&mut session, Rating::Good, at(i)).unwrap();
            assert!(matches!(event, Event::CardPresented { .. }));
            assert_eq!(session.state(), SessionState::InProgress);
        }

        let event = rate_current(&mut session, Rating::Perfect, at(3)).unwrap();
        assert!(matches!(event, Event::SessionCompleted { .. }));
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.summary().total, 4);
        assert_eq!(session.summary().good, 3);
        assert_eq!(session.summary().perfect, 1);
    }

    #[test]
    fn completed_is_terminal() {
        let mut session = Session::new("d", cards(1));
        session.start(at(0)).unwrap();
        rate_current(&mut session, Rating::Bad, at(0)).unwrap();
        assert_eq!(session.state(), SessionState::Completed);

        assert!(session.start(at(1)).is_none());
        assert!(rate_current(&mut session, Rating::Bad, at(1)).is_none());
        assert_eq!(session.state(), SessionState::Completed);
        assert!(session.current_card().is_none());
        assert_eq!(session.remaining(), 0);
    }

    #[test]
    fn start_twice_is_a_no_op() {
        let mut session = Session::new("d", cards(2));
        assert!(session.start(at(0)).is_some());
        assert!(session.start(at(0)).is_none());
        assert_eq!(session.position(), Some(0));
    }

    #[test]
    fn rated_card_replaces_snapshot_copy() {
        let mut session = Session::new("d", cards(2));
        session.start(at(0)).unwrap();
        rate_current(&mut session, Rating::Good, at(10)).unwrap();
        assert_eq!(session.cards()[0].last_answered_at, Some(at(10)));
        assert_eq!(session.remaining(), 1);
        assert_eq!(session.current_card().map(|c| c.id.as_str()), Some("2"));
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut session = Session::new("d", cards(3));
        session.start(at(0)).unwrap();
        match session.snapshot(at(1)) {
            Event::StateSnapshot { state, position, of, .. } => {
                assert_eq!(state, SessionState::InProgress);
                assert_eq!(position, Some(0));
                assert_eq!(of, 3);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
