//! # Flashdeck Core Library
//!
//! This library provides the core logic for Flashdeck, a flashcard study
//! tool. Every operation is available through the standalone CLI binary;
//! any other front end is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Session Scheduler**: picks the next presentable card, applies a
//!   recall rating as a fixed lockout, and drives a
//!   `NotStarted -> InProgress -> Completed` state machine
//! - **Storage**: whole-document JSON values in a key-value store (SQLite
//!   or in-memory) behind a [`Repository`], plus TOML configuration
//! - **Clock**: injected time source so scheduling is testable without
//!   the wall clock
//!
//! ## Key Components
//!
//! - [`Scheduler`]: session scheduling over a repository and a clock
//! - [`Session`]: one pass over a deck's available cards
//! - [`Repository`]: decks, rating history and aggregate stats
//! - [`Config`]: application configuration management

pub mod clock;
pub mod deck;
pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use deck::{Card, CardStatus, Deck, Rating, RatingEvent};
pub use error::{ConfigError, CoreError, Result, StoreError, ValidationError};
pub use events::Event;
pub use session::{Scheduler, Session, SessionOutcome, SessionStart, SessionState};
pub use stats::{AggregateStats, SessionSummary};
pub use storage::{Config, KeyValueStore, MemoryStore, Repository, SqliteStore};
