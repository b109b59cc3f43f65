//! Property tests for card availability and rating counters.

use chrono::{DateTime, Utc};
use flashdeck_core::session::{apply_rating, available_cards};
use flashdeck_core::{AggregateStats, Card, Deck, Rating};
use proptest::prelude::*;

const MAX_MS: i64 = 4_102_444_800_000;

fn at(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap()
}

fn card_strategy() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![Just(None), (0..MAX_MS).prop_map(Some)]
}

fn rating_strategy() -> impl Strategy<Value = Rating> {
    prop_oneof![
        Just(Rating::Perfect),
        Just(Rating::Good),
        Just(Rating::Bad),
        Just(Rating::None),
    ]
}

fn deck_from(blocks: &[Option<i64>]) -> Deck {
    Deck {
        id: "deck".into(),
        name: "Deck".into(),
        cards: blocks
            .iter()
            .enumerate()
            .map(|(i, blocked)| Card {
                id: i.to_string(),
                question: format!("q{i}"),
                answer: format!("a{i}"),
                last_answered_at: blocked.map(|_| at(0)),
                blocked_until: blocked.map(at),
            })
            .collect(),
    }
}

proptest! {
    #[test]
    fn available_is_exactly_the_unblocked_subsequence(
        blocks in prop::collection::vec(card_strategy(), 0..24),
        now in 0..MAX_MS,
    ) {
        let deck = deck_from(&blocks);
        let got: Vec<String> = available_cards(&deck, at(now)).into_iter().map(|c| c.id).collect();
        let expected: Vec<String> = blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.map_or(true, |ms| ms <= now))
            .map(|(i, _)| i.to_string())
            .collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn rating_blocks_for_table_duration(
        rating in rating_strategy(),
        now in 0..(MAX_MS - 86_400_000),
    ) {
        let card = Card::new("q", "a");
        let rated = apply_rating(&card, rating, at(now));
        prop_assert_eq!(rated.last_answered_at, Some(at(now)));
        prop_assert_eq!(
            rated.blocked_until.map(|t| t.timestamp_millis()),
            Some(now + rating.lockout_ms())
        );
        prop_assert!(rated.blocked_until >= rated.last_answered_at);
    }

    #[test]
    fn stats_total_matches_rating_count(
        ratings in prop::collection::vec(rating_strategy(), 0..64),
    ) {
        let mut stats = AggregateStats::default();
        for r in &ratings {
            stats.record(*r);
        }
        prop_assert_eq!(stats.total, ratings.len() as u64);
        prop_assert_eq!(stats.perfect + stats.good + stats.bad + stats.none, stats.total);
    }
}
