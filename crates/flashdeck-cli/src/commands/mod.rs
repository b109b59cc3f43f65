pub mod card;
pub mod config;
pub mod deck;
pub mod stats;
pub mod study;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use flashdeck_core::{Config, Repository, SqliteStore};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Load the config and open the store it names.
pub fn open_repository() -> Result<(Config, Repository<SqliteStore>), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = SqliteStore::open(&config)?;
    Ok((config, Repository::new(store)))
}

const FALLBACK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render a timestamp in local time with the configured format.
///
/// An unparseable format string falls back to `%Y-%m-%d %H:%M`.
pub fn format_time(config: &Config, at: DateTime<Utc>) -> String {
    let configured = config.display.time_format.as_str();
    let valid = StrftimeItems::new(configured).all(|item| !matches!(item, Item::Error));
    let fmt = if valid { configured } else { FALLBACK_TIME_FORMAT };
    at.with_timezone(&Local).format(fmt).to_string()
}
