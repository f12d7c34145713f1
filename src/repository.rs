// src/repository.rs

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Result};

/// Fetches the raw JSON stored under `key`, if any.
pub fn read_record(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM app_state WHERE key = ?",
        [key],
        |row| row.get(0),
    )
    .optional()
}

/// Replaces the whole record under `key` in a single statement.
pub fn write_record(conn: &Connection, key: &str, value: &str, updated_at: i64) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO app_state (key, value, updated_at) VALUES (?, ?, ?)",
        params![key, value, updated_at],
    )?;
    debug!("[DB] Wrote {} ({} bytes)", key, value.len());
    Ok(())
}

pub fn delete_record(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM app_state WHERE key = ?", [key])?;
    debug!("[DB] Deleted {}", key);
    Ok(())
}
