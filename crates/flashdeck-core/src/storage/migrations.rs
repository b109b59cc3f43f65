//! Schema migrations for the key-value store.
//!
//! Migrations are versioned and applied automatically when opening a store.
//! The `schema_version` table tracks the current migration version.

use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the store to [`SCHEMA_VERSION`].
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version.
///
/// Returns 0 if no version is set (fresh store).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!("failed to read schema_version: {e}");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: the `kv` document table.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()?;
    Ok(())
}

/// Migration v2: adopt documents written under the legacy key names.
///
/// - `flashcardDecks` becomes `decks`, with each card's `lastAnswered`
///   renamed to `lastAnsweredAt`
/// - `globalStats` becomes `aggregateStats`, with `totalCards` renamed to
///   `total`
///
/// A legacy document is only moved when the new key is still empty.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    if let Some(decks) = take_legacy(&tx, "flashcardDecks", "decks")? {
        put(&tx, "decks", &convert_legacy_decks(decks))?;
        info!("migrated legacy flashcardDecks document");
    }

    if let Some(stats) = take_legacy(&tx, "globalStats", "aggregateStats")? {
        let converted = match serde_json::from_str::<serde_json::Value>(&stats) {
            Ok(serde_json::Value::Object(mut obj)) => {
                if let Some(total) = obj.remove("totalCards") {
                    obj.entry("total").or_insert(total);
                }
                serde_json::Value::Object(obj).to_string()
            }
            _ => {
                warn!("legacy globalStats is not a JSON object, copying unchanged");
                stats
            }
        };
        put(&tx, "aggregateStats", &converted)?;
        info!("migrated legacy globalStats document");
    }

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    Ok(())
}

fn convert_legacy_decks(raw: String) -> String {
    let mut decks = match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Array(decks)) => decks,
        _ => {
            warn!("legacy flashcardDecks is not a JSON array, copying unchanged");
            return raw;
        }
    };
    let cards = decks
        .iter_mut()
        .filter_map(|deck| deck.get_mut("cards")?.as_array_mut())
        .flatten()
        .filter_map(serde_json::Value::as_object_mut);
    for card in cards {
        if let Some(last) = card.remove("lastAnswered") {
            card.entry("lastAnsweredAt").or_insert(last);
        }
    }
    serde_json::Value::Array(decks).to_string()
}

/// Remove and return `legacy` if present and `current` is unset.
fn take_legacy(conn: &Connection, legacy: &str, current: &str) -> SqliteResult<Option<String>> {
    let exists: bool = conn
        .query_row("SELECT 1 FROM kv WHERE key = ?1", params![current], |_| Ok(()))
        .optional()?
        .is_some();
    if exists {
        return Ok(None);
    }

    let value: Option<String> = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", params![legacy], |row| row.get(0))
        .optional()?;
    if value.is_some() {
        conn.execute("DELETE FROM kv WHERE key = ?1", params![legacy])?;
    }
    Ok(value)
}

fn put(conn: &Connection, key: &str, value: &str) -> SqliteResult<()> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(conn: &Connection, key: &str) -> Option<String> {
        conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()
            .unwrap()
    }

    #[test]
    fn test_migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn test_legacy_keys_are_adopted() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        put(
            &conn,
            "flashcardDecks",
            r#"[{"id":"1","name":"Old","cards":[
                {"id":"c1","question":"q","answer":"a","lastAnswered":1000,"blockedUntil":61000},
                {"id":"c2","question":"q","answer":"a","lastAnswered":null,"blockedUntil":null}
            ]}]"#,
        )
        .unwrap();
        put(&conn, "globalStats", r#"{"totalCards":3,"perfect":1,"good":1,"bad":1,"none":0}"#)
            .unwrap();

        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), 2);
        assert!(value(&conn, "flashcardDecks").is_none());
        assert!(value(&conn, "globalStats").is_none());
        let decks: serde_json::Value =
            serde_json::from_str(&value(&conn, "decks").unwrap()).unwrap();
        assert_eq!(decks[0]["name"], "Old");
        let card = &decks[0]["cards"][0];
        assert_eq!(card["lastAnsweredAt"], 1000);
        assert_eq!(card["blockedUntil"], 61000);
        assert!(card.get("lastAnswered").is_none());
        assert!(decks[0]["cards"][1]["lastAnsweredAt"].is_null());

        let stats: serde_json::Value =
            serde_json::from_str(&value(&conn, "aggregateStats").unwrap()).unwrap();
        assert_eq!(stats["total"], 3);
        assert!(stats.get("totalCards").is_none());
    }

    #[test]
    fn test_legacy_key_does_not_clobber_current() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        put(&conn, "decks", "[]").unwrap();
        put(&conn, "flashcardDecks", r#"[{"id":"1","name":"Old","cards":[]}]"#).unwrap();

        migrate(&conn).unwrap();

        assert_eq!(value(&conn, "decks").as_deref(), Some("[]"));
        assert!(value(&conn, "flashcardDecks").is_some());
    }
}
