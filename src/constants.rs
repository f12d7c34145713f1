// src/constants.rs

// --- Time Constants ---
pub const TICK_MS_DEFAULT: u64 = 1000;

// --- Accrual Parameters (cents per focused second at 1.0x) ---
pub const BASE_RATE_CENTS_PER_SEC: f64 = 5.0;
pub const GROWTH_INTERVAL_SEC: u32 = 30;
pub const SUB_CENT_UNITS: u64 = 1_000_000; // carry resolution: micro-cents

pub const GROWTH_FACTOR_NOVICE: f64 = 1.0205; // 1.5x at 10 min
pub const GROWTH_FACTOR_INTERMEDIATE: f64 = 1.0469; // 2.5x at 10 min
pub const GROWTH_FACTOR_ADVANCED: f64 = 1.0711; // 3x at 8 min
pub const GROWTH_FACTOR_EXPERT: f64 = 1.0906; // 4x at 8 min

pub const MAX_MULTIPLIER_NOVICE: f64 = 1.5;
pub const MAX_MULTIPLIER_INTERMEDIATE: f64 = 2.5;
pub const MAX_MULTIPLIER_ADVANCED: f64 = 3.0;
pub const MAX_MULTIPLIER_EXPERT: f64 = 4.0;

// --- Streaks & Overnight Bonus ---
pub const BONUS_PERCENT_PER_STREAK_DAY: u64 = 1;
pub const STREAK_MILESTONE_DAYS: u32 = 7;

// --- Session Labels (local hour boundaries) ---
pub const MORNING_END_HOUR: u32 = 12;
pub const AFTERNOON_END_HOUR: u32 = 17;
pub const LABEL_MORNING: &str = "Morning Focus";
pub const LABEL_AFTERNOON: &str = "Afternoon Flow";
pub const LABEL_EVENING: &str = "Evening Practice";

// --- Persistence ---
pub const STORAGE_KEY: &str = "focusbank_state";
pub const DB_FILE_NAME: &str = "focusbank.db";
pub const DATA_DIR_NAME: &str = ".focusbank";

// --- Preferences Defaults ---
pub const DEFAULT_QUOTE_INTERVAL_SEC: u32 = 15;
pub const DEFAULT_VOLUME: u8 = 50;
pub const MAX_VOLUME: u8 = 100;

// --- Ambient Sound ---
pub const CROSSFADE_MS: u64 = 750;

// --- Quotes ---
pub const EMPTY_QUOTE_PLACEHOLDER: &str = "Add a quote to begin.";
pub const STARTER_QUOTES: [&str; 5] = [
    "I'm aligned with success.",
    "Every breath attracts opportunity.",
    "Wealth flows where focus goes.",
    "I radiate calm, confidence, and abundance.",
    "I welcome unexpected money with gratitude.",
];
