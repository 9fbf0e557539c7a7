// src/types/window.rs
//! Half-open time windows and the instant formats accepted at the edges.

use super::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use std::fmt;

/// A half-open interval `[from, to)` bounding one upstream query.
///
/// Construction guarantees `from < to`. Windows are never mutated; a stuck
/// window is replaced by the two halves returned from [`TimeWindow::bisect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, ValidationError> {
        if from >= to {
            return Err(ValidationError::EmptyWindow {
                from: format_instant(from),
                to: format_instant(to),
            });
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    pub fn duration(&self) -> TimeDelta {
        self.to - self.from
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from <= instant && instant < self.to
    }

    /// Temporal midpoint, truncated to whole seconds.
    pub fn midpoint(&self) -> DateTime<Utc> {
        let from = self.from.timestamp();
        let to = self.to.timestamp();
        let mid = from + (to - from) / 2;
        DateTime::from_timestamp(mid, 0).unwrap_or(self.from)
    }

    /// Splits the window at its midpoint into `[from, mid)` and `[mid, to)`.
    ///
    /// Returns `None` once the window is too narrow for the midpoint to fall
    /// strictly inside it.
    pub fn bisect(&self) -> Option<(TimeWindow, TimeWindow)> {
        let mid = self.midpoint();
        if mid <= self.from || mid >= self.to {
            return None;
        }
        Some((
            TimeWindow {
                from: self.from,
                to: mid,
            },
            TimeWindow { from: mid, to: self.to },
        ))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            format_instant(self.from),
            format_instant(self.to)
        )
    }
}

/// Renders an instant the way the search API expects it.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses a date, a naive date-time (read as UTC) or an RFC 3339 instant.
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = input.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidTimestamp {
            input: input.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(input: &str) -> DateTime<Utc> {
        parse_instant(input).unwrap()
    }

    #[test]
    fn rejects_empty_and_inverted_windows() {
        let t = at("2024-12-10");
        assert!(TimeWindow::new(t, t).is_err());
        assert!(TimeWindow::new(at("2025-01-10"), t).is_err());
    }

    #[test]
    fn midpoint_of_december_window() {
        let window = TimeWindow::new(at("2024-12-10"), at("2025-01-10")).unwrap();
        assert_eq!(window.midpoint(), at("2024-12-25T12:00:00Z"));
    }

    #[test]
    fn bisection_halves_meet_at_midpoint() {
        let window = TimeWindow::new(at("2024-12-10"), at("2025-01-10")).unwrap();
        let (early, late) = window.bisect().unwrap();
        assert_eq!(early.from(), window.from());
        assert_eq!(early.to(), late.from());
        assert_eq!(late.to(), window.to());
        assert_eq!(early.duration() + late.duration(), window.duration());

        let mid = window.midpoint();
        assert!(!early.contains(mid));
        assert!(late.contains(mid));
    }

    #[test]
    fn odd_second_widths_truncate() {
        let window =
            TimeWindow::new(at("2024-01-01T00:00:00Z"), at("2024-01-01T00:00:03Z")).unwrap();
        assert_eq!(window.midpoint(), at("2024-01-01T00:00:01Z"));
    }

    #[test]
    fn one_second_window_cannot_be_split() {
        let window =
            TimeWindow::new(at("2024-01-01T00:00:00Z"), at("2024-01-01T00:00:01Z")).unwrap();
        assert!(window.bisect().is_none());
    }

    #[test]
    fn parses_accepted_instant_formats() {
        let expected = at("2024-03-05T10:20:30Z");
        assert_eq!(at("2024-03-05 10:20:30"), expected);
        assert_eq!(at("2024-03-05T10:20:30"), expected);
        assert_eq!(at("2024-03-05T12:20:30+02:00"), expected);
        assert_eq!(format_instant(at("2024-03-05")), "2024-03-05T00:00:00Z");
        assert!(parse_instant("05/03/2024").is_err());
    }
}
