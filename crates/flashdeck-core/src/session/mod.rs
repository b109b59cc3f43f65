mod engine;
mod scheduler;
mod selection;

pub use engine::{Session, SessionOutcome, SessionState};
pub use scheduler::{Scheduler, SessionStart};
pub use selection::{apply_rating, available_cards, next_card};
