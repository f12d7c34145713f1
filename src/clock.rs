// src/clock.rs

use chrono::{FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

/// Source of the current instant and of local calendar time.
///
/// Timestamps are milliseconds since the Unix epoch. Calendar decisions
/// (streak days, session labels) go through `local` so they can be pinned
/// to a fixed zone in tests.
pub trait Clock {
    fn now(&self) -> i64;
    fn local(&self, ts_ms: i64) -> NaiveDateTime;

    fn local_date(&self, ts_ms: i64) -> NaiveDate {
        self.local(ts_ms).date()
    }

    fn local_hour(&self, ts_ms: i64) -> u32 {
        self.local(ts_ms).hour()
    }
}

/// Wall clock in the machine's time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn local(&self, ts_ms: i64) -> NaiveDateTime {
        Local
            .timestamp_millis_opt(ts_ms)
            .single()
            .map(|dt| dt.naive_local())
            .unwrap_or_default()
    }
}

/// A clock frozen at one instant in a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now_ms: i64,
    pub offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now_ms: i64, offset: FixedOffset) -> Self {
        FixedClock { now_ms, offset }
    }

    /// Builds a clock at the given local wall time in `offset`.
    pub fn at_local(local: NaiveDateTime, offset: FixedOffset) -> Option<Self> {
        let now_ms = offset
            .from_local_datetime(&local)
            .single()?
            .timestamp_millis();
        Some(FixedClock { now_ms, offset })
    }

    pub fn advance_ms(&mut self, ms: i64) {
        self.now_ms += ms;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.now_ms
    }

    fn local(&self, ts_ms: i64) -> NaiveDateTime {
        self.offset
            .timestamp_millis_opt(ts_ms)
            .single()
            .map(|dt| dt.naive_local())
            .unwrap_or_default()
    }
}
