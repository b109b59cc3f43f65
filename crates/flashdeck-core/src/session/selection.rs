//! Pure card-selection rules. No storage, no clock.

use chrono::{DateTime, Utc};

use crate::deck::{Card, Deck, Rating};

/// Cards of `deck` that may be presented at `now`, in deck order.
///
/// A card qualifies when it was never blocked or its block has expired
/// (`blocked_until <= now`).
pub fn available_cards(deck: &Deck, now: DateTime<Utc>) -> Vec<Card> {
    deck.cards
        .iter()
        .filter(|card| card.is_available(now))
        .cloned()
        .collect()
}

/// Index of the card after `current`, or `None` when the pass is over.
///
/// `current == None` means nothing has been presented yet, so selection
/// begins at index 0.
pub fn next_card(available: &[Card], current: Option<usize>) -> Option<usize> {
    let next = current.map_or(0, |i| i + 1);
    (next < available.len()).then_some(next)
}

/// The card as it stands after being rated at `now`.
///
/// `Rating::None` sets `blocked_until` to `now`: immediately available
/// again, but distinguishable from a card that was never blocked.
pub fn apply_rating(card: &Card, rating: Rating, now: DateTime<Utc>) -> Card {
    Card {
        last_answered_at: Some(now),
        blocked_until: Some(now + rating.lockout()),
        ..card.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn card(id: &str, blocked_until: Option<i64>) -> Card {
        Card {
            id: id.into(),
            question: format!("q{id}"),
            answer: format!("a{id}"),
            last_answered_at: blocked_until.map(|_| at(0)),
            blocked_until: blocked_until.map(at),
        }
    }

    #[test]
    fn available_keeps_order_and_skips_blocked() {
        let deck = Deck {
            id: "d".into(),
            name: "D".into(),
            cards: vec![card("1", None), card("2", Some(4_102_444_800_000)), card("3", Some(100))],
        };
        let ids: Vec<String> = available_cards(&deck, at(100)).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["1", "3"]);

        let ids: Vec<String> = available_cards(&deck, at(99)).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["1"]);
    }

    #[test]
    fn next_card_walks_forward_then_stops() {
        let cards = vec![card("1", None), card("2", None)];
        assert_eq!(next_card(&cards, None), Some(0));
        assert_eq!(next_card(&cards, Some(0)), Some(1));
        assert_eq!(next_card(&cards, Some(1)), None);
        assert_eq!(next_card(&[], None), None);
    }

    #[test]
    fn rating_sets_lockout_from_table() {
        let now = at(1_000_000);
        let base = card("1", None);

        let cases = [
            (Rating::Perfect, 86_400_000),
            (Rating::Good, 3_600_000),
            (Rating::Bad, 60_000),
            (Rating::None, 0),
        ];
        for (rating, ms) in cases {
            let rated = apply_rating(&base, rating, now);
            assert_eq!(rated.last_answered_at, Some(now));
            assert_eq!(rated.blocked_until, Some(now + Duration::milliseconds(ms)), "{rating}");
            assert!(rated.blocked_until >= rated.last_answered_at);
        }
    }

    #[test]
    fn rating_none_is_available_immediately_but_not_new() {
        let now = at(5);
        let rated = apply_rating(&card("1", None), Rating::None, now);
        assert!(rated.is_available(now));
        assert!(!rated.is_new());
        assert!(rated.blocked_until.is_some());
    }

    #[test]
    fn rating_leaves_text_alone() {
        let base = card("7", None);
        let rated = apply_rating(&base, Rating::Good, at(0));
        assert_eq!(rated.id, base.id);
        assert_eq!(rated.question, base.question);
        assert_eq!(rated.answer, base.answer);
    }
}
