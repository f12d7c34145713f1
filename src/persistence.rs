// src/persistence.rs

use crate::constants::*;
use crate::database;
use crate::errors::StoreError;
use crate::models::{AmbientTrack, BankState};
use crate::repository;
use chrono::Utc;
use log::{error, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde_json::Value;
use std::convert::Infallible;
use std::path::Path;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable home of the single `BankState` record.
pub struct StateStore {
    conn: Connection,
}

impl StateStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        // Several processes may share the file; wait for their writes.
        conn.busy_timeout(BUSY_TIMEOUT)?;
        database::init_db(&conn)?;
        Ok(StateStore { conn })
    }

    /// In-memory store, used by tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        database::init_db(&conn)?;
        Ok(StateStore { conn })
    }

    /// Loads the stored record, falling back to defaults.
    ///
    /// A record that fails to parse or validate is deleted; there is no
    /// partial recovery. Database errors are returned and leave the record
    /// in place.
    pub fn load(&self) -> Result<BankState, StoreError> {
        match self.try_load() {
            Ok(Some(state)) => Ok(state),
            Ok(None) => {
                info!("[Store] No stored state, starting fresh");
                Ok(BankState::default())
            }
            Err(e @ StoreError::Sqlite(_)) => {
                error!("[Store] Failed to read app state: {}", e);
                Err(e)
            }
            Err(e) => {
                error!("[Store] Stored app state is corrupt, discarding it: {}", e);
                if let Err(e) = repository::delete_record(&self.conn, STORAGE_KEY) {
                    error!("[Store] Failed to clear corrupted state: {}", e);
                }
                Ok(BankState::default())
            }
        }
    }

    pub fn try_load(&self) -> Result<Option<BankState>, StoreError> {
        load_from(&self.conn)
    }

    /// Saves the record. Failures are logged and swallowed; the caller's
    /// in-memory state stays authoritative.
    pub fn save(&self, state: &BankState) {
        if let Err(e) = self.try_save(state) {
            error!("[Store] Failed to save app state: {}", e);
        }
    }

    pub fn try_save(&self, state: &BankState) -> Result<(), StoreError> {
        save_to(&self.conn, state)
    }

    /// Takes the write lock up front so a read-modify-write cannot
    /// interleave with another writer.
    fn begin_immediate(&self) -> Result<Transaction<'_>, StoreError> {
        Ok(Transaction::new_unchecked(
            &self.conn,
            TransactionBehavior::Immediate,
        )?)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

fn load_from(conn: &Connection) -> Result<Option<BankState>, StoreError> {
    let raw = match repository::read_record(conn, STORAGE_KEY)? {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let mut value: Value = serde_json::from_str(&raw)?;
    migrate(&mut value)?;
    let state: BankState = serde_json::from_value(value)?;
    validate(&state)?;
    Ok(Some(state))
}

fn save_to(conn: &Connection, state: &BankState) -> Result<(), StoreError> {
    let json = serde_json::to_string(state)?;
    repository::write_record(conn, STORAGE_KEY, &json, Utc::now().timestamp_millis())?;
    Ok(())
}

/// Rewrites values written by older versions before schema validation.
/// Missing fields are filled from defaults during deserialization.
fn migrate(value: &mut Value) -> Result<(), StoreError> {
    let root = value.as_object_mut().ok_or_else(|| StoreError::Invalid {
        field: "root",
        reason: "expected an object".to_string(),
    })?;

    if let Some(music) = root
        .get_mut("preferences")
        .and_then(Value::as_object_mut)
        .and_then(|prefs| prefs.get_mut("music"))
    {
        if let Some(track) = music.as_str().and_then(AmbientTrack::from_legacy_name) {
            info!("[Store] Migrating legacy music pack {} -> {}", music, track);
            *music = Value::String(track.as_str().to_string());
        }
    }

    Ok(())
}

fn validate(state: &BankState) -> Result<(), StoreError> {
    let prefs = &state.preferences;
    if prefs.volume > MAX_VOLUME {
        return Err(StoreError::Invalid {
            field: "preferences.volume",
            reason: format!("must be at most {}, got {}", MAX_VOLUME, prefs.volume),
        });
    }
    if prefs.quote_interval_sec == 0 {
        return Err(StoreError::Invalid {
            field: "preferences.quoteIntervalSec",
            reason: "must be positive".to_string(),
        });
    }
    if let Some(entry) = state.history.iter().find(|e| e.id.is_empty()) {
        return Err(StoreError::Invalid {
            field: "history.id",
            reason: format!("empty id on entry at {}", entry.timestamp),
        });
    }
    if state.current_streak > state.longest_streak {
        warn!(
            "[Store] Stored streak {} exceeds longest {}",
            state.current_streak, state.longest_streak
        );
    }
    Ok(())
}

/// In-memory authority over the ledger. Every change is one whole-value
/// replace followed by a save.
pub struct Ledger {
    store: StateStore,
    state: BankState,
}

impl Ledger {
    pub fn open(store: StateStore) -> Result<Self, StoreError> {
        let state = store.load()?;
        Ok(Ledger { store, state })
    }

    pub fn state(&self) -> &BankState {
        &self.state
    }

    /// Overwrites the ledger with `next` regardless of what is stored.
    pub fn replace(&mut self, next: BankState) {
        self.state = next;
        self.store.save(&self.state);
    }

    /// Picks up changes written to the store since the last read.
    /// Keeps the in-memory state when the store cannot be read.
    pub fn refresh(&mut self) {
        match self.store.try_load() {
            Ok(Some(latest)) => adopt(&mut self.state, latest),
            Ok(None) => {}
            Err(e) => warn!("[Ledger] Could not refresh from store: {}", e),
        }
    }

    /// Derives the next state from the freshest stored one and saves it.
    ///
    /// Read, change and write happen under one immediate transaction, so a
    /// concurrent writer is never overwritten. If `f` fails nothing changes.
    /// Storage failures are logged and the in-memory state still advances.
    pub fn transact<T, E>(
        &mut self,
        f: impl FnOnce(&BankState) -> Result<(BankState, T), E>,
    ) -> Result<T, E> {
        let tx = match self.store.begin_immediate() {
            Ok(tx) => Some(tx),
            Err(e) => {
                error!("[Ledger] Could not lock store, using in-memory state: {}", e);
                None
            }
        };
        if let Some(tx) = &tx {
            match load_from(tx) {
                Ok(Some(latest)) => adopt(&mut self.state, latest),
                Ok(None) => {}
                Err(e) => warn!("[Ledger] Could not refresh from store: {}", e),
            }
        }

        let (next, out) = f(&self.state)?;
        self.state = next;

        match tx {
            Some(tx) => {
                if let Err(e) = save_to(&tx, &self.state).and_then(|_| Ok(tx.commit()?)) {
                    error!("[Store] Failed to save app state: {}", e);
                }
            }
            None => self.store.save(&self.state),
        }
        Ok(out)
    }

    pub fn update(&mut self, f: impl FnOnce(&BankState) -> BankState) {
        let result: Result<(), Infallible> = self.transact(|state| Ok((f(state), ())));
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }
}

fn adopt(current: &mut BankState, latest: BankState) {
    if latest != *current {
        info!("[Ledger] Picked up changes written by another session");
        *current = latest;
    }
}
