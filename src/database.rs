// src/database.rs

use log::debug;
use rusqlite::{Connection, Result};

pub fn init_db(conn: &Connection) -> Result<()> {
    debug!("[Store] init_db: Checking database schema...");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
        ",
    )?;

    Ok(())
}
