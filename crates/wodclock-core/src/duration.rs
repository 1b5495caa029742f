//! Interval parsing and clock formatting.
//!
//! Round durations are stored as PostgreSQL interval text (`"00:01:30"`).
//! This module is the single place that turns that text into a [`Duration`]
//! and turns seconds back into display text.
//!
//! # Bounds
//!
//! Durations are whole seconds; fractional seconds are accepted and
//! truncated. Hours are unbounded: a day prefix (`"1 day 02:00:00"`) folds
//! into hours and the clock renders `26:00:00`, never wrapping at 24 hours.

use std::time::Duration;

use crate::error::DurationError;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Parse interval text: `[N day[s]] [HH:]MM:SS[.fraction]`.
pub fn parse(input: &str) -> Result<Duration, DurationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationError::Empty);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let (days, clock) = match tokens.as_slice() {
        [clock] => (0, Some(*clock)),
        [n, unit] if is_day_unit(unit) => (digits(n).ok_or_else(|| invalid(input, "bad day count"))?, None),
        [n, unit, clock] if is_day_unit(unit) => {
            (digits(n).ok_or_else(|| invalid(input, "bad day count"))?, Some(*clock))
        },
        _ => return Err(invalid(input, "expected [N days] HH:MM:SS")),
    };

    let clock_secs = match clock {
        Some(clock) => parse_clock(input, clock)?,
        None => 0,
    };

    days.checked_mul(SECS_PER_DAY)
        .and_then(|secs| secs.checked_add(clock_secs))
        .map(Duration::from_secs)
        .ok_or_else(|| invalid(input, "too large"))
}

fn parse_clock(input: &str, clock: &str) -> Result<u64, DurationError> {
    let parts: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (digits(h), digits(m), whole_seconds(s)),
        [m, s] => (Some(0), digits(m), whole_seconds(s)),
        _ => return Err(invalid(input, "expected HH:MM:SS")),
    };

    let (Some(hours), Some(minutes), Some(seconds)) = (hours, minutes, seconds) else {
        return Err(invalid(input, "non-numeric component"));
    };

    if minutes >= 60 || seconds >= 60 {
        return Err(invalid(input, "minutes and seconds must be below 60"));
    }

    hours
        .checked_mul(SECS_PER_HOUR)
        .and_then(|secs| secs.checked_add(minutes * SECS_PER_MINUTE + seconds))
        .ok_or_else(|| invalid(input, "too large"))
}

fn is_day_unit(token: &str) -> bool {
    matches!(token, "day" | "days")
}

fn digits(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn whole_seconds(part: &str) -> Option<u64> {
    match part.split_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|b| b.is_ascii_digit()) => digits(whole),
        Some(_) => None,
        None => digits(part),
    }
}

fn invalid(input: &str, reason: &'static str) -> DurationError {
    DurationError::Invalid { input: input.to_string(), reason }
}

/// Render seconds as a clock: `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / SECS_PER_HOUR;
    let minutes = (total_secs % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total_secs % SECS_PER_MINUTE;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Render a duration as interval text, `HH:MM:SS`.
pub fn format_interval(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / SECS_PER_HOUR;
    let minutes = (total_secs % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total_secs % SECS_PER_MINUTE;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Serde adapter storing a [`Duration`] as interval text.
///
/// Deserialization also accepts a bare integer number of seconds.
pub mod interval {
    use std::{fmt, time::Duration};

    use serde::{Deserializer, Serializer, de};

    /// Serialize as `HH:MM:SS`.
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_interval(*duration))
    }

    /// Deserialize from interval text or integer seconds.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        deserializer.deserialize_any(IntervalVisitor)
    }

    struct IntervalVisitor;

    impl de::Visitor<'_> for IntervalVisitor {
        type Value = Duration;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an interval such as \"00:01:30\" or a number of seconds")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
            super::parse(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
            u64::try_from(v)
                .map(Duration::from_secs)
                .map_err(|_| E::custom("duration cannot be negative"))
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parse_postgres_interval() {
        assert_eq!(parse("00:00:05"), Ok(Duration::from_secs(5)));
        assert_eq!(parse("00:01:30"), Ok(Duration::from_secs(90)));
        assert_eq!(parse("01:00:00"), Ok(Duration::from_secs(3600)));
    }

    #[test]
    fn parse_minutes_seconds() {
        assert_eq!(parse("2:05"), Ok(Duration::from_secs(125)));
    }

    #[test]
    fn parse_day_prefix() {
        assert_eq!(parse("1 day 02:00:00"), Ok(Duration::from_secs(26 * 3600)));
        assert_eq!(parse("2 days"), Ok(Duration::from_secs(48 * 3600)));
    }

    #[test]
    fn parse_truncates_fraction() {
        assert_eq!(parse("00:00:05.75"), Ok(Duration::from_secs(5)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse("  "), Err(DurationError::Empty));
        assert!(parse("abc").is_err());
        assert!(parse("00:61:00").is_err());
        assert!(parse("-00:00:05").is_err());
        assert!(parse("1:2:3:4").is_err());
        assert!(parse("3 weeks 00:00:00").is_err());
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(754), "12:34");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(3600), "1:00:00");
        assert_eq!(format_clock(26 * 3600 + 61), "26:01:01");
    }

    #[test]
    fn interval_format() {
        assert_eq!(format_interval(Duration::from_secs(90)), "00:01:30");
        assert_eq!(format_interval(Duration::from_secs(26 * 3600)), "26:00:00");
    }

    proptest! {
        #[test]
        fn interval_text_parses_back(secs in 0u64..1_000_000) {
            let d = Duration::from_secs(secs);
            prop_assert_eq!(parse(&format_interval(d)), Ok(d));
        }

        #[test]
        fn parse_never_panics(s in "\\PC{0,24}") {
            let _ = parse(&s);
        }
    }
}
