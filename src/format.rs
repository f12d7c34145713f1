// src/format.rs

use crate::clock::Clock;
use chrono::Timelike;

pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

pub fn format_duration(seconds: u64) -> String {
    let mins = seconds / 60;
    if mins == 0 {
        format!("{}s", seconds % 60)
    } else {
        format!("{}m", mins)
    }
}

/// "Today 9:05 AM", "Yesterday 11:40 PM", otherwise "Mar 3 2:00 PM".
pub fn format_timestamp(clock: &impl Clock, ts_ms: i64) -> String {
    let when = clock.local(ts_ms);
    let today = clock.local_date(clock.now());
    let day = when.date();

    let date_str = if day == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_string()
    } else {
        when.format("%b %-d").to_string()
    };

    let (is_pm, hour12) = when.hour12();
    format!(
        "{} {}:{:02} {}",
        date_str,
        hour12,
        when.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{FixedOffset, NaiveDate};

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(0), "$0.00");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(123_456), "$1234.56");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(60), "1m");
        assert_eq!(format_duration(3599), "59m");
    }

    #[test]
    fn test_format_timestamp_relative_days() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let at = |d: u32, h: u32, m: u32| {
            let local = NaiveDate::from_ymd_opt(2024, 3, d)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap();
            FixedClock::at_local(local, offset).unwrap().now()
        };
        let clock = FixedClock::new(at(10, 12, 0), offset);

        assert_eq!(format_timestamp(&clock, at(10, 9, 5)), "Today 9:05 AM");
        assert_eq!(format_timestamp(&clock, at(9, 23, 40)), "Yesterday 11:40 PM");
        assert_eq!(format_timestamp(&clock, at(3, 14, 0)), "Mar 3 2:00 PM");
        assert_eq!(format_timestamp(&clock, at(10, 0, 0)), "Today 12:00 AM");
    }
}
