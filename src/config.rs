// src/config.rs

use crate::constants::*;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "FOCUSBANK_DB";
pub const ENV_TICK_MS: &str = "FOCUSBANK_TICK_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite file holding the ledger
    pub db_path: PathBuf,

    /// Wall-clock period of one focus tick
    pub tick_period: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = var(ENV_DB_PATH)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_db_path(var("HOME")));

        let tick_ms = var(ENV_TICK_MS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(TICK_MS_DEFAULT);

        AppConfig {
            db_path,
            tick_period: Duration::from_millis(tick_ms),
        }
    }
}

fn default_db_path(home: Option<String>) -> PathBuf {
    match home {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(DATA_DIR_NAME).join(DB_FILE_NAME),
        _ => PathBuf::from(DB_FILE_NAME),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: default_db_path(None),
            tick_period: Duration::from_millis(TICK_MS_DEFAULT),
        }
    }
}
