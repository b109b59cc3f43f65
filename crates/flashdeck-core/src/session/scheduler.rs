//! Session scheduling over a repository and a clock.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use super::engine::{Session, SessionOutcome};
use super::selection::{apply_rating, available_cards};
use crate::clock::Clock;
use crate::deck::{Card, Rating, RatingEvent};
use crate::error::Result;
use crate::events::Event;
use crate::storage::{KeyValueStore, Repository};

/// Result of asking for a new session.
#[derive(Debug)]
pub enum SessionStart {
    /// The first card is being presented.
    Started { session: Session, events: Vec<Event> },
    /// Nothing to study. `event` is a `SessionUnavailable`.
    Unavailable { outcome: SessionOutcome, event: Event },
}

impl SessionStart {
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self {
            SessionStart::Started { .. } => None,
            SessionStart::Unavailable { outcome, .. } => Some(*outcome),
        }
    }
}

/// Selects cards, applies ratings and keeps the stored documents in step.
pub struct Scheduler<S, C> {
    repo: Repository<S>,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> Scheduler<S, C> {
    pub fn new(repo: Repository<S>, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut Repository<S> {
        &mut self.repo
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Cards of `deck_id` presentable right now. Empty for unknown decks.
    pub fn available_cards(&self, deck_id: &str) -> Result<Vec<Card>> {
        let now = self.now();
        Ok(self
            .repo
            .find_deck(deck_id)?
            .map(|deck| available_cards(&deck, now))
            .unwrap_or_default())
    }

    /// Begin a pass over the cards of `deck_id` that are available now.
    pub fn start_session(&self, deck_id: &str) -> Result<SessionStart> {
        let now = self.now();
        let outcome = match self.repo.find_deck(deck_id)? {
            None => SessionOutcome::DeckNotFound,
            Some(deck) if deck.cards.is_empty() => SessionOutcome::EmptyDeck,
            Some(deck) => {
                let available = available_cards(&deck, now);
                debug!(
                    "deck {deck_id}: {} of {} cards available",
                    available.len(),
                    deck.cards.len()
                );
                let mut session = Session::new(deck_id, available);
                let started = Event::SessionStarted {
                    deck_id: deck_id.to_string(),
                    available: session.len(),
                    at: now,
                };
                match session.start(now) {
                    Some(presented) => {
                        return Ok(SessionStart::Started {
                            session,
                            events: vec![started, presented],
                        });
                    }
                    None => SessionOutcome::AllBlocked,
                }
            }
        };

        info!("session on deck {deck_id} unavailable: {}", outcome.describe());
        Ok(SessionStart::Unavailable {
            outcome,
            event: Event::SessionUnavailable {
                deck_id: deck_id.to_string(),
                outcome,
                at: now,
            },
        })
    }

    /// Rate `card` of `deck_id` now.
    ///
    /// The card's new lockout, the rating event and the bumped aggregate
    /// stats are written as one batch before returning. If the card no
    /// longer exists in storage the updated card is still returned but
    /// nothing is written.
    pub fn apply_rating(&mut self, deck_id: &str, card: &Card, rating: Rating) -> Result<Card> {
        let now = self.now();
        let rated = apply_rating(card, rating, now);
        let event = RatingEvent::new(deck_id, &card.id, rating, now);

        match self.repo.record_rating(&rated, event)? {
            Some(stats) => info!(
                "rated card {} in deck {deck_id} as {rating} (total answered {})",
                card.id, stats.total
            ),
            None => warn!("card {} vanished from deck {deck_id}; rating not recorded", card.id),
        }
        Ok(rated)
    }

    /// Rate the card `session` is showing and move the session on.
    ///
    /// Returns the `CardRated` event followed by either the next
    /// `CardPresented` or `SessionCompleted`. Empty when the session is not
    /// showing a card.
    pub fn rate(&mut self, session: &mut Session, rating: Rating) -> Result<Vec<Event>> {
        let Some(card) = session.current_card().cloned() else {
            return Ok(Vec::new());
        };
        let deck_id = session.deck_id().to_string();

        let rated = self.apply_rating(&deck_id, &card, rating)?;
        let at = rated.last_answered_at.unwrap_or_else(|| self.now());
        let rated_event = Event::CardRated {
            deck_id,
            card_id: rated.id.clone(),
            rating,
            blocked_until: rated.blocked_until.unwrap_or(at),
            at,
        };

        let mut events = vec![rated_event];
        events.extend(session.finish_current(rated, rating, at));
        Ok(events)
    }
}
