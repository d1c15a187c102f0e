//! Display formatting for prices, times and durations.

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};

const THOUSANDS_SEPARATOR: char = '\u{a0}';

/// Local time zone from a configured UTC offset in minutes.
pub fn display_offset(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix())
}

/// Whole rubles with grouped thousands: `12 345`.
pub fn format_price(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(c);
    }

    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn local(epoch_seconds: i64, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    if epoch_seconds == 0 {
        return None;
    }
    DateTime::from_timestamp(epoch_seconds, 0).map(|dt| dt.with_timezone(tz))
}

/// `HH:MM`, or an empty string when the timestamp is unset.
pub fn format_time(epoch_seconds: i64, tz: &FixedOffset) -> String {
    local(epoch_seconds, tz)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// `DD.MM.YYYY`, or an empty string when the timestamp is unset.
pub fn format_date(epoch_seconds: i64, tz: &FixedOffset) -> String {
    local(epoch_seconds, tz)
        .map(|dt| dt.format("%d.%m.%Y").to_string())
        .unwrap_or_default()
}

/// Hour of day in the display zone; used by the time-of-day filters.
pub fn local_hour(epoch_seconds: i64, tz: &FixedOffset) -> Option<u32> {
    DateTime::from_timestamp(epoch_seconds, 0).map(|dt| dt.with_timezone(tz).hour())
}

/// `9 ч 5 мин`; zero parts are omitted.
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return String::new();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(format!("{hours} ч"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} мин"));
    }
    parts.join(" ")
}

/// `9:05`.
pub fn format_duration_colons(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 3600, (seconds % 3600) / 60)
}

pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "0");
        assert_eq!(format_price(999.4), "999");
        assert_eq!(format_price(1500.0), "1\u{a0}500");
        assert_eq!(format_price(1234567.5), "1\u{a0}234\u{a0}568");
    }

    #[test]
    fn test_format_time_and_date() {
        let msk = display_offset(180);
        // 2023-11-14 22:13:20 UTC
        assert_eq!(format_time(1_700_000_000, &msk), "01:13");
        assert_eq!(format_date(1_700_000_000, &msk), "15.11.2023");
        assert_eq!(format_time(0, &msk), "");
        assert_eq!(local_hour(1_700_000_000, &display_offset(0)), Some(22));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(32_700), "9 ч 5 мин");
        assert_eq!(format_duration(7_200), "2 ч");
        assert_eq!(format_duration(300), "5 мин");
        assert_eq!(format_duration(0), "");
        assert_eq!(format_duration_colons(32_700), "9:05");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("москва"), "Москва");
        assert_eq!(capitalize(""), "");
    }
}
