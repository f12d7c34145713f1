// src/streak.rs

use crate::clock::Clock;
use crate::constants::*;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakInput {
    pub now: i64,
    pub last_deposit_date: Option<i64>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub bank_total_cents: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakOutcome {
    pub new_streak: u32,
    pub new_longest_streak: u32,
    pub bonus_cents: u64,
    pub is_milestone: bool,
}

/// Local calendar days from the last deposit to `now`. `None` before the first deposit.
pub fn days_since_last_deposit(clock: &impl Clock, now: i64, last: Option<i64>) -> Option<i64> {
    let last = last?;
    let today = clock.local_date(now);
    let last_day = clock.local_date(last);
    Some(today.signed_duration_since(last_day).num_days())
}

/// Overnight compound bonus: 1% of the bank per day of the prior streak, floored.
pub fn compound_bonus(bank_total_cents: u64, prior_streak: u32) -> u64 {
    let bonus = bank_total_cents as u128 * BONUS_PERCENT_PER_STREAK_DAY as u128 * prior_streak as u128
        / 100;
    u64::try_from(bonus).unwrap_or(u64::MAX)
}

pub fn compute_streak(clock: &impl Clock, input: &StreakInput) -> StreakOutcome {
    let days = days_since_last_deposit(clock, input.now, input.last_deposit_date);

    let (new_streak, bonus_cents) = match days {
        None => {
            debug!("[Streak] First deposit");
            (1, 0)
        }
        Some(0) => {
            debug!("[Streak] Same day, keeping {}", input.current_streak);
            (input.current_streak.max(1), 0)
        }
        Some(1) => {
            let bonus = if input.current_streak > 0 {
                compound_bonus(input.bank_total_cents, input.current_streak)
            } else {
                0
            };
            debug!(
                "[Streak] Consecutive day: {} -> {}, bonus {}",
                input.current_streak,
                input.current_streak.saturating_add(1),
                bonus
            );
            (input.current_streak.saturating_add(1), bonus)
        }
        // A last deposit in the future (clock moved backwards) also resets.
        Some(d) => {
            debug!("[Streak] Day difference {}, resetting from {}", d, input.current_streak);
            (1, 0)
        }
    };

    StreakOutcome {
        new_streak,
        new_longest_streak: new_streak.max(input.longest_streak),
        bonus_cents,
        is_milestone: new_streak == STREAK_MILESTONE_DAYS && new_streak != input.current_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{FixedOffset, NaiveDate, TimeZone};

    fn clock_at(y: i32, m: u32, d: u32, h: u32, min: u32) -> FixedClock {
        let local = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap();
        FixedClock::at_local(local, FixedOffset::east_opt(2 * 3600).unwrap()).unwrap()
    }

    fn input(clock: &FixedClock, last: Option<i64>, streak: u32, longest: u32, bank: u64) -> StreakInput {
        StreakInput {
            now: clock.now(),
            last_deposit_date: last,
            current_streak: streak,
            longest_streak: longest,
            bank_total_cents: bank,
        }
    }

    #[test]
    fn test_first_deposit_starts_streak() {
        let clock = clock_at(2024, 5, 10, 9, 0);
        let out = compute_streak(&clock, &input(&clock, None, 0, 0, 0));
        assert_eq!(out.new_streak, 1);
        assert_eq!(out.new_longest_streak, 1);
        assert_eq!(out.bonus_cents, 0);
        assert!(!out.is_milestone);
    }

    #[test]
    fn test_consecutive_day_grows_streak_with_bonus() {
        let yesterday = clock_at(2024, 5, 9, 20, 0).now();
        let clock = clock_at(2024, 5, 10, 8, 0);
        let out = compute_streak(&clock, &input(&clock, Some(yesterday), 3, 3, 12_345));
        assert_eq!(out.new_streak, 4);
        assert_eq!(out.new_longest_streak, 4);
        // floor(12345 * 0.01 * 3)
        assert_eq!(out.bonus_cents, 370);
    }

    #[test]
    fn test_same_day_keeps_streak_without_bonus() {
        let earlier = clock_at(2024, 5, 10, 7, 0).now();
        let clock = clock_at(2024, 5, 10, 22, 0);
        let out = compute_streak(&clock, &input(&clock, Some(earlier), 2, 6, 50_000));
        assert_eq!(out.new_streak, 2);
        assert_eq!(out.new_longest_streak, 6);
        assert_eq!(out.bonus_cents, 0);
    }

    #[test]
    fn test_same_day_never_leaves_zero_streak() {
        let earlier = clock_at(2024, 5, 10, 7, 0).now();
        let clock = clock_at(2024, 5, 10, 9, 0);
        let out = compute_streak(&clock, &input(&clock, Some(earlier), 0, 0, 0));
        assert_eq!(out.new_streak, 1);
        assert_eq!(out.new_longest_streak, 1);
    }

    #[test]
    fn test_gap_resets_streak_but_keeps_longest() {
        let three_days_ago = clock_at(2024, 5, 7, 12, 0).now();
        let clock = clock_at(2024, 5, 10, 12, 0);
        let out = compute_streak(&clock, &input(&clock, Some(three_days_ago), 5, 5, 90_000));
        assert_eq!(out.new_streak, 1);
        assert_eq!(out.new_longest_streak, 5);
        assert_eq!(out.bonus_cents, 0);
    }

    #[test]
    fn test_consecutive_day_with_zero_streak_has_no_bonus() {
        let yesterday = clock_at(2024, 5, 9, 12, 0).now();
        let clock = clock_at(2024, 5, 10, 12, 0);
        let out = compute_streak(&clock, &input(&clock, Some(yesterday), 0, 0, 100_000));
        assert_eq!(out.new_streak, 1);
        assert_eq!(out.bonus_cents, 0);
    }

    #[test]
    fn test_midnight_boundary_is_a_new_day() {
        let before_midnight = clock_at(2024, 5, 9, 23, 59).now();
        let clock = clock_at(2024, 5, 10, 0, 1);
        assert_eq!(
            days_since_last_deposit(&clock, clock.now(), Some(before_midnight)),
            Some(1)
        );
        let out = compute_streak(&clock, &input(&clock, Some(before_midnight), 1, 1, 1000));
        assert_eq!(out.new_streak, 2);
        assert_eq!(out.bonus_cents, 10);
    }

    #[test]
    fn test_almost_48h_across_one_midnight_is_consecutive() {
        let early = clock_at(2024, 5, 9, 0, 5).now();
        let clock = clock_at(2024, 5, 10, 23, 55);
        let out = compute_streak(&clock, &input(&clock, Some(early), 4, 4, 0));
        assert_eq!(out.new_streak, 5);
    }

    #[test]
    fn test_last_deposit_in_future_resets_streak() {
        let future = clock_at(2024, 5, 12, 12, 0).now();
        let clock = clock_at(2024, 5, 10, 12, 0);
        let out = compute_streak(&clock, &input(&clock, Some(future), 5, 6, 5000));
        assert_eq!(out.new_streak, 1);
        assert_eq!(out.new_longest_streak, 6);
        assert_eq!(out.bonus_cents, 0);
        assert!(!out.is_milestone);
    }

    /// Offset switches from `before` to `after` at `switch_ms`, like a
    /// zone entering daylight saving time.
    struct ShiftingClock {
        now_ms: i64,
        switch_ms: i64,
        before: FixedOffset,
        after: FixedOffset,
    }

    impl Clock for ShiftingClock {
        fn now(&self) -> i64 {
            self.now_ms
        }

        fn local(&self, ts_ms: i64) -> chrono::NaiveDateTime {
            let offset = if ts_ms < self.switch_ms { self.before } else { self.after };
            offset.timestamp_millis_opt(ts_ms).unwrap().naive_local()
        }
    }

    #[test]
    fn test_short_dst_day_still_counts_as_consecutive() {
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let edt = FixedOffset::west_opt(4 * 3600).unwrap();
        let at = |offset: FixedOffset, d: u32, h: u32, min: u32| {
            let local = NaiveDate::from_ymd_opt(2024, 3, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap();
            offset.from_local_datetime(&local).unwrap().timestamp_millis()
        };
        // 2024-03-10 02:00 EST becomes 03:00 EDT.
        let last = at(est, 10, 0, 30);
        let clock = ShiftingClock {
            now_ms: at(edt, 11, 0, 10),
            switch_ms: at(est, 10, 2, 0),
            before: est,
            after: edt,
        };
        // Less than 23 hours of real time, one calendar day apart.
        assert!(clock.now_ms - last < 23 * 3600 * 1000);
        assert_eq!(days_since_last_deposit(&clock, clock.now_ms, Some(last)), Some(1));

        let out = compute_streak(
            &clock,
            &StreakInput {
                now: clock.now_ms,
                last_deposit_date: Some(last),
                current_streak: 2,
                longest_streak: 2,
                bank_total_cents: 10_000,
            },
        );
        assert_eq!(out.new_streak, 3);
        assert_eq!(out.bonus_cents, 200);
    }

    #[test]
    fn test_seventh_day_is_milestone() {
        let yesterday = clock_at(2024, 5, 9, 12, 0).now();
        let clock = clock_at(2024, 5, 10, 12, 0);
        let out = compute_streak(&clock, &input(&clock, Some(yesterday), 6, 6, 0));
        assert_eq!(out.new_streak, 7);
        assert!(out.is_milestone);

        let later = clock_at(2024, 5, 10, 18, 0);
        let again = compute_streak(&later, &input(&later, Some(clock.now()), 7, 7, 0));
        assert_eq!(again.new_streak, 7);
        assert!(!again.is_milestone);
    }

    #[test]
    fn test_compound_bonus_floors_and_does_not_overflow() {
        assert_eq!(compound_bonus(99, 1), 0);
        assert_eq!(compound_bonus(100, 1), 1);
        assert_eq!(compound_bonus(1_000, 7), 70);
        assert_eq!(compound_bonus(u64::MAX, u32::MAX), u64::MAX);
    }
}
