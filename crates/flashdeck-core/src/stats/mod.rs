//! Rating counters.
//!
//! [`AggregateStats`] is the document stored under `aggregateStats`. It is
//! only ever incremented, one step per submitted rating, and is never
//! rebuilt from the rating history. The same shape doubles as the
//! end-of-session summary.

use serde::{Deserialize, Serialize};

use crate::deck::Rating;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub perfect: u64,
    #[serde(default)]
    pub good: u64,
    #[serde(default)]
    pub bad: u64,
    #[serde(default)]
    pub none: u64,
}

impl AggregateStats {
    pub fn record(&mut self, rating: Rating) {
        self.total += 1;
        match rating {
            Rating::Perfect => self.perfect += 1,
            Rating::Good => self.good += 1,
            Rating::Bad => self.bad += 1,
            Rating::None => self.none += 1,
        }
    }

    pub fn count(&self, rating: Rating) -> u64 {
        match rating {
            Rating::Perfect => self.perfect,
            Rating::Good => self.good,
            Rating::Bad => self.bad,
            Rating::None => self.none,
        }
    }

    /// Share of answers rated `rating`, 0.0 when nothing was answered.
    pub fn ratio(&self, rating: Rating) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(rating) as f64 / self.total as f64
    }
}

/// Counts for a single study session.
pub type SessionSummary = AggregateStats;
