// src/ingest/scheduler.rs
//! Walking history one calendar month at a time.

use super::bisector::RangeBisector;
use super::registry::KnownIdSet;
use super::report::IngestionReport;
use crate::error::AppError;
use crate::types::TimeWindow;
use chrono::{DateTime, Months, Utc};

/// Lazy sequence of calendar-month windows covering `[start, end)`.
///
/// The k-th window starts `k` months after `start`, so a start on the 31st
/// does not drift after short months. The last window is clipped to `end`.
/// Cloning yields an independent iterator from the same position.
#[derive(Debug, Clone)]
pub struct MonthlyWindows {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    next_month: u32,
}

impl MonthlyWindows {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            next_month: 0,
        }
    }

    fn month_offset(&self, months: u32) -> Option<DateTime<Utc>> {
        self.start.checked_add_months(Months::new(months))
    }
}

impl Iterator for MonthlyWindows {
    type Item = TimeWindow;

    fn next(&mut self) -> Option<TimeWindow> {
        let from = self.month_offset(self.next_month)?;
        if from >= self.end {
            return None;
        }
        let to = self
            .month_offset(self.next_month + 1)
            .map_or(self.end, |to| to.min(self.end));
        self.next_month += 1;
        TimeWindow::new(from, to).ok()
    }
}

/// Drives the bisector over every month of history, oldest first.
pub struct WindowScheduler<'a> {
    bisector: RangeBisector<'a>,
}

impl<'a> WindowScheduler<'a> {
    pub fn new(bisector: RangeBisector<'a>) -> Self {
        Self { bisector }
    }

    /// Ingests `[start, end)` one month at a time, each month finished before
    /// the next begins.
    pub async fn run(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        known: &mut KnownIdSet,
        report: &mut IngestionReport,
    ) -> Result<(), AppError> {
        for window in MonthlyWindows::new(start, end) {
            report.windows_scheduled += 1;
            let before = report.orders_ingested;
            log::info!("Ingesting {}", window);

            self.bisector.ingest(window, 0, known, report).await?;

            log::info!(
                "Finished {}: {} new orders",
                window,
                report.orders_ingested - before
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_instant;
    use pretty_assertions::assert_eq;

    fn at(input: &str) -> DateTime<Utc> {
        parse_instant(input).unwrap()
    }

    fn bounds(windows: MonthlyWindows) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        windows.map(|w| (w.from(), w.to())).collect()
    }

    #[test]
    fn covers_span_with_short_final_window() {
        let windows = MonthlyWindows::new(at("2024-11-01"), at("2025-01-15T06:00:00Z"));
        assert_eq!(
            bounds(windows),
            vec![
                (at("2024-11-01"), at("2024-12-01")),
                (at("2024-12-01"), at("2025-01-01")),
                (at("2025-01-01"), at("2025-01-15T06:00:00Z")),
            ]
        );
    }

    #[test]
    fn month_end_start_does_not_drift() {
        let windows = MonthlyWindows::new(at("2024-01-31"), at("2024-04-30"));
        assert_eq!(
            bounds(windows),
            vec![
                (at("2024-01-31"), at("2024-02-29")),
                (at("2024-02-29"), at("2024-03-31")),
                (at("2024-03-31"), at("2024-04-30")),
            ]
        );
    }

    #[test]
    fn empty_when_start_is_not_before_end() {
        let t = at("2024-06-01");
        assert_eq!(MonthlyWindows::new(t, t).count(), 0);
        assert_eq!(MonthlyWindows::new(at("2024-07-01"), t).count(), 0);
    }

    #[test]
    fn clones_restart_independently() {
        let mut windows = MonthlyWindows::new(at("2024-01-01"), at("2024-06-01"));
        let fresh = windows.clone();
        windows.next();
        assert_eq!(windows.count(), 4);
        assert_eq!(fresh.count(), 5);
    }
}
