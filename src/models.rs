// src/models.rs

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- Difficulty Tiers ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Difficulty {
    Novice = 1,
    #[default]
    Intermediate = 2,
    Advanced = 3,
    Expert = 4,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Novice,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Novice => "Novice",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        }
    }

    /// Accrual parameters for this tier. The table is fixed at build time.
    pub fn config(&self) -> DifficultyConfig {
        let (growth_factor, max_multiplier) = match self {
            Difficulty::Novice => (GROWTH_FACTOR_NOVICE, MAX_MULTIPLIER_NOVICE),
            Difficulty::Intermediate => (GROWTH_FACTOR_INTERMEDIATE, MAX_MULTIPLIER_INTERMEDIATE),
            Difficulty::Advanced => (GROWTH_FACTOR_ADVANCED, MAX_MULTIPLIER_ADVANCED),
            Difficulty::Expert => (GROWTH_FACTOR_EXPERT, MAX_MULTIPLIER_EXPERT),
        };
        DifficultyConfig {
            base_rate_cents_per_sec: BASE_RATE_CENTS_PER_SEC,
            growth_factor,
            growth_interval_sec: GROWTH_INTERVAL_SEC,
            max_multiplier,
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "novice" => Ok(Difficulty::Novice),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    pub base_rate_cents_per_sec: f64,
    pub growth_factor: f64,
    pub growth_interval_sec: u32,
    pub max_multiplier: f64,
}

// --- Preferences ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Galaxy,
    Ocean,
    #[serde(rename = "Neon Glow")]
    NeonGlow,
    Minimal,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Galaxy => "Galaxy",
            Theme::Ocean => "Ocean",
            Theme::NeonGlow => "Neon Glow",
            Theme::Minimal => "Minimal",
        }
    }
}

impl FromStr for Theme {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "galaxy" => Ok(Theme::Galaxy),
            "ocean" => Ok(Theme::Ocean),
            "neon glow" | "neonglow" => Ok(Theme::NeonGlow),
            "minimal" => Ok(Theme::Minimal),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AmbientTrack {
    #[default]
    #[serde(rename = "Deep Space")]
    DeepSpace,
    Cosmos,
    #[serde(rename = "Forest Sonnet")]
    ForestSonnet,
    #[serde(rename = "Prairie Whispers")]
    PrairieWhispers,
}

impl AmbientTrack {
    pub const ALL: [AmbientTrack; 4] = [
        AmbientTrack::DeepSpace,
        AmbientTrack::Cosmos,
        AmbientTrack::ForestSonnet,
        AmbientTrack::PrairieWhispers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AmbientTrack::DeepSpace => "Deep Space",
            AmbientTrack::Cosmos => "Cosmos",
            AmbientTrack::ForestSonnet => "Forest Sonnet",
            AmbientTrack::PrairieWhispers => "Prairie Whispers",
        }
    }

    /// Maps music pack names written by older versions onto the current catalogue.
    pub fn from_legacy_name(name: &str) -> Option<AmbientTrack> {
        match name {
            "LoFi" => Some(AmbientTrack::DeepSpace),
            "528Hz" => Some(AmbientTrack::Cosmos),
            "Waves" => Some(AmbientTrack::ForestSonnet),
            _ => None,
        }
    }
}

impl FromStr for AmbientTrack {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(track) = AmbientTrack::from_legacy_name(s) {
            return Ok(track);
        }
        match s.to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "deep space" | "deepspace" => Ok(AmbientTrack::DeepSpace),
            "cosmos" => Ok(AmbientTrack::Cosmos),
            "forest sonnet" | "forestsonnet" => Ok(AmbientTrack::ForestSonnet),
            "prairie whispers" | "prairiewhispers" => Ok(AmbientTrack::PrairieWhispers),
            _ => Err(format!("Unknown track: {}", s)),
        }
    }
}

impl fmt::Display for AmbientTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub music: AmbientTrack,
    pub quote_interval_sec: u32,
    pub auto_deposit_on_exit: bool,
    pub volume: u8,
    pub difficulty: Difficulty,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            theme: Theme::default(),
            music: AmbientTrack::default(),
            quote_interval_sec: DEFAULT_QUOTE_INTERVAL_SEC,
            auto_deposit_on_exit: false,
            volume: DEFAULT_VOLUME,
            difficulty: Difficulty::default(),
        }
    }
}

// --- Persisted Ledger ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DepositHistoryEntry {
    pub id: String,
    pub amount_cents: u64,
    pub duration_sec: u64,
    pub label: String,
    pub timestamp: i64,
}

/// The durable root record. Every change produces a new value that the
/// store replaces wholesale.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct BankState {
    pub bank_total_cents: u64,
    /// Newest first.
    pub history: Vec<DepositHistoryEntry>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_deposit_date: Option<i64>,
    pub preferences: Preferences,
    pub favorites: Vec<String>,
    pub custom_quotes: Vec<String>,
}

// --- Session ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_str_is_case_insensitive() {
        assert_eq!("expert".parse::<Difficulty>(), Ok(Difficulty::Expert));
        assert_eq!("Novice".parse::<Difficulty>(), Ok(Difficulty::Novice));
        assert!("legendary".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_intermediate_config_values() {
        let cfg = Difficulty::Intermediate.config();
        assert_eq!(cfg.base_rate_cents_per_sec, 5.0);
        assert_eq!(cfg.growth_factor, 1.0469);
        assert_eq!(cfg.growth_interval_sec, 30);
        assert_eq!(cfg.max_multiplier, 2.5);
    }

    #[test]
    fn test_every_config_is_well_formed() {
        for tier in Difficulty::ALL {
            let cfg = tier.config();
            assert!(cfg.base_rate_cents_per_sec >= 0.0, "{}", tier);
            assert!(cfg.growth_factor > 1.0, "{}", tier);
            assert!(cfg.growth_interval_sec > 0, "{}", tier);
            assert!(cfg.max_multiplier >= 1.0, "{}", tier);
        }
    }

    #[test]
    fn test_track_serde_uses_display_names() {
        let json = serde_json::to_string(&AmbientTrack::PrairieWhispers).unwrap();
        assert_eq!(json, "\"Prairie Whispers\"");
        let theme: Theme = serde_json::from_str("\"Neon Glow\"").unwrap();
        assert_eq!(theme, Theme::NeonGlow);
    }

    #[test]
    fn test_legacy_track_names_parse() {
        assert_eq!("LoFi".parse::<AmbientTrack>(), Ok(AmbientTrack::DeepSpace));
        assert_eq!("528Hz".parse::<AmbientTrack>(), Ok(AmbientTrack::Cosmos));
        assert_eq!("forest-sonnet".parse::<AmbientTrack>(), Ok(AmbientTrack::ForestSonnet));
    }

    #[test]
    fn test_bank_state_fills_missing_fields() {
        let state: BankState =
            serde_json::from_str(r#"{"bankTotalCents": 1200, "preferences": {"volume": 80}}"#)
                .unwrap();
        assert_eq!(state.bank_total_cents, 1200);
        assert_eq!(state.current_streak, 0);
        assert_eq!(state.preferences.volume, 80);
        assert_eq!(state.preferences.quote_interval_sec, DEFAULT_QUOTE_INTERVAL_SEC);
        assert_eq!(state.preferences.difficulty, Difficulty::Intermediate);
    }
}
