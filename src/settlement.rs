// src/settlement.rs

use crate::accrual::SessionAccrual;
use crate::clock::Clock;
use crate::constants::*;
use crate::errors::DepositError;
use crate::format::{format_cents, format_duration};
use crate::models::{BankState, DepositHistoryEntry};
use crate::streak::{compute_streak, StreakInput};
use log::info;

/// What a deposit did, for reporting back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositReceipt {
    pub entry: DepositHistoryEntry,
    pub bonus_cents: u64,
    pub prior_streak: u32,
    pub new_streak: u32,
    pub is_milestone: bool,
    pub new_bank_total_cents: u64,
}

impl DepositReceipt {
    pub fn title(&self) -> String {
        format!("Banked {} of focus", format_duration(self.entry.duration_sec))
    }

    pub fn description(&self) -> String {
        if self.bonus_cents > 0 {
            format!(
                "Night bonus: +{} from {}-day streak!",
                format_cents(self.bonus_cents),
                self.prior_streak
            )
        } else {
            "Your future self says thanks.".to_string()
        }
    }

    pub fn milestone_message(&self) -> Option<&'static str> {
        self.is_milestone
            .then_some("7-Day Streak! A week of focus. You're building something real.")
    }
}

/// The next ledger plus the receipt. Produced whole or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub state: BankState,
    pub receipt: DepositReceipt,
}

pub fn session_label(hour: u32) -> &'static str {
    if hour < MORNING_END_HOUR {
        LABEL_MORNING
    } else if hour < AFTERNOON_END_HOUR {
        LABEL_AFTERNOON
    } else {
        LABEL_EVENING
    }
}

/// `hx_{timestamp}`, suffixed when an entry with that id already exists.
fn next_history_id(history: &[DepositHistoryEntry], now: i64) -> String {
    let base = format!("hx_{}", now);
    if !history.iter().any(|e| e.id == base) {
        return base;
    }
    (1u32..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !history.iter().any(|e| &e.id == candidate))
        .unwrap_or(base)
}

/// Moves a session's accrued balance into the bank.
///
/// Pure with respect to its inputs: the same state, accrual and clock always
/// give the same settlement, whichever path (confirmed or on-exit) asked for it.
pub fn settle_deposit(
    state: &BankState,
    accrual: &SessionAccrual,
    clock: &impl Clock,
) -> Result<Settlement, DepositError> {
    if accrual.session_cents == 0 {
        return Err(DepositError::NothingToDeposit);
    }

    let now = clock.now();
    let streak = compute_streak(
        clock,
        &StreakInput {
            now,
            last_deposit_date: state.last_deposit_date,
            current_streak: state.current_streak,
            longest_streak: state.longest_streak,
            bank_total_cents: state.bank_total_cents,
        },
    );

    let entry = DepositHistoryEntry {
        id: next_history_id(&state.history, now),
        amount_cents: accrual.session_cents,
        duration_sec: accrual.focused_seconds,
        label: session_label(clock.local_hour(now)).to_string(),
        timestamp: now,
    };

    let new_bank_total_cents = state
        .bank_total_cents
        .saturating_add(accrual.session_cents)
        .saturating_add(streak.bonus_cents);

    let mut history = Vec::with_capacity(state.history.len() + 1);
    history.push(entry.clone());
    history.extend(state.history.iter().cloned());

    let next = BankState {
        bank_total_cents: new_bank_total_cents,
        history,
        current_streak: streak.new_streak,
        longest_streak: streak.new_longest_streak,
        last_deposit_date: Some(now),
        ..state.clone()
    };

    info!(
        "[Settlement] Deposited {} ({}s) + bonus {} -> bank {} | streak {} -> {} (longest {})",
        entry.amount_cents,
        entry.duration_sec,
        streak.bonus_cents,
        new_bank_total_cents,
        state.current_streak,
        streak.new_streak,
        streak.new_longest_streak
    );

    Ok(Settlement {
        state: next,
        receipt: DepositReceipt {
            entry,
            bonus_cents: streak.bonus_cents,
            prior_streak: state.current_streak,
            new_streak: streak.new_streak,
            is_milestone: streak.is_milestone,
            new_bank_total_cents,
        },
    })
}

/// Clears the whole ledger back to defaults.
pub fn reset_bank() -> BankState {
    info!("[Settlement] Bank reset to defaults");
    BankState::default()
}
