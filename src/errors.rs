// src/errors.rs

use crate::models::SessionState;
use thiserror::Error;

/// Rejected deposit attempts. These are user-facing and leave the ledger untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DepositError {
    #[error("Nothing to deposit: start a session first to build your balance")]
    NothingToDeposit,
}

/// Invalid session state-machine transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {action} while session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    Deposit(#[from] DepositError),
}

impl SessionError {
    pub fn invalid(action: &'static str, state: SessionState) -> Self {
        SessionError::InvalidTransition {
            action,
            state: state.as_str(),
        }
    }
}

/// Persisted state store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid stored state ({field}): {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Ambient sound collaborator errors. Never fatal to a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SoundError {
    #[error("Track unavailable: {track}")]
    TrackUnavailable { track: String },

    #[error("Sound backend not initialized")]
    NotInitialized,

    #[error("Sound backend error: {0}")]
    Backend(String),
}
