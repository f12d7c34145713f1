// src/accrual.rs

use crate::constants::SUB_CENT_UNITS;
use crate::models::DifficultyConfig;
use log::debug;

// --- Multiplier ---

/// Focus multiplier after `elapsed_sec` seconds:
/// `min(growth_factor ^ (elapsed_sec / growth_interval_sec), max_multiplier)`.
///
/// Exactly 1.0 at zero and never above the tier cap.
pub fn multiplier(elapsed_sec: u64, cfg: &DifficultyConfig) -> f64 {
    if elapsed_sec == 0 || cfg.growth_interval_sec == 0 {
        return 1.0;
    }
    let intervals = elapsed_sec as f64 / cfg.growth_interval_sec as f64;
    let raw = cfg.growth_factor.max(1.0).powf(intervals);
    if raw.is_nan() || raw >= cfg.max_multiplier {
        return cfg.max_multiplier.max(1.0);
    }
    raw.max(1.0)
}

/// Fraction of the way from 1.0x to the tier cap, in [0, 1].
pub fn multiplier_progress(multiplier: f64, max_multiplier: f64) -> f64 {
    if max_multiplier <= 1.0 {
        return 1.0;
    }
    ((multiplier - 1.0) / (max_multiplier - 1.0)).clamp(0.0, 1.0)
}

// --- Accumulator ---

/// Per-session accrual. Each tick consumes the previous value and yields the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionAccrual {
    pub focused_seconds: u64,
    pub session_cents: u64,
    /// Unbanked remainder in micro-cents, always below one cent.
    pub carry_units: u64,
    pub current_multiplier: f64,
}

impl Default for SessionAccrual {
    fn default() -> Self {
        SessionAccrual {
            focused_seconds: 0,
            session_cents: 0,
            carry_units: 0,
            current_multiplier: 1.0,
        }
    }
}

impl SessionAccrual {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one completed focus second.
    pub fn tick(self, cfg: &DifficultyConfig) -> SessionAccrual {
        let focused_seconds = self.focused_seconds + 1;
        let current_multiplier = multiplier(focused_seconds, cfg);

        // Each second's earnings are rounded once to whole micro-cents; from
        // there on the carry is exact integer arithmetic.
        let earned = cfg.base_rate_cents_per_sec.max(0.0) * current_multiplier;
        let earned_units = (earned * SUB_CENT_UNITS as f64).round() as u64;
        let total = self.carry_units.saturating_add(earned_units);

        let next = SessionAccrual {
            focused_seconds,
            session_cents: self.session_cents.saturating_add(total / SUB_CENT_UNITS),
            carry_units: total % SUB_CENT_UNITS,
            current_multiplier,
        };

        if focused_seconds % cfg.growth_interval_sec.max(1) as u64 == 0 {
            debug!(
                "[Accrual] t={}s mult={:.4} cents={} carry={:.4}",
                next.focused_seconds,
                next.current_multiplier,
                next.session_cents,
                next.fractional_cents_carry()
            );
        }
        next
    }

    /// Applies `seconds` consecutive ticks.
    pub fn advance(self, seconds: u64, cfg: &DifficultyConfig) -> SessionAccrual {
        (0..seconds).fold(self, |acc, _| acc.tick(cfg))
    }

    /// The carry as a fraction of a cent, in [0, 1).
    pub fn fractional_cents_carry(&self) -> f64 {
        self.carry_units as f64 / SUB_CENT_UNITS as f64
    }

    pub fn is_empty(&self) -> bool {
        self.session_cents == 0
    }
}
