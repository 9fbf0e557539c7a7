// src/ingest/mod.rs
//! Adaptive range ingestion.
//!
//! History is walked one calendar month at a time. Each month is paged
//! through until the upstream signals the end of results. When pagination
//! stalls (full pages that only repeat known orders) the window is halved and
//! both halves are ingested in order, down to a bounded depth.
//!
//! ```text
//! WindowScheduler -> RangeBisector -> PageCursor -> StuckDetector
//!                                         |
//!                              KnownIdSet + OrderSink
//! ```

pub mod bisector;
pub mod cursor;
pub mod registry;
pub mod report;
pub mod scheduler;
pub mod stuck;

use crate::api::OrderSource;
use crate::constants::{MAX_BISECTION_DEPTH, SEARCH_PAGE_SIZE, STUCK_PAGE_THRESHOLD};
use crate::error::AppError;
use crate::store::OrderSink;
use chrono::{DateTime, Utc};

pub use bisector::RangeBisector;
pub use cursor::PageCursor;
pub use registry::KnownIdSet;
pub use report::{AbandonReason, AbandonedWindow, IngestionReport};
pub use scheduler::{MonthlyWindows, WindowScheduler};
pub use stuck::StuckDetector;

/// What to do when a stuck window can no longer be bisected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DepthExhaustionPolicy {
    /// Log the window, record it in the report and carry on.
    #[default]
    Log,
    /// Stop the run with [`AppError::WindowAbandoned`].
    Abort,
}

/// Tunables of the ingestion core.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub page_size: usize,
    pub stuck_threshold: u32,
    pub max_depth: u32,
    pub on_depth_exhausted: DepthExhaustionPolicy,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            page_size: SEARCH_PAGE_SIZE,
            stuck_threshold: STUCK_PAGE_THRESHOLD,
            max_depth: MAX_BISECTION_DEPTH,
            on_depth_exhausted: DepthExhaustionPolicy::default(),
        }
    }
}

/// Result of draining one window.
///
/// Progress itself is already recorded in the registry and the sink, so the
/// bisector only needs to know whether the window got stuck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionOutcome {
    pub got_stuck: bool,
    /// Pages requested while draining.
    pub pages: u32,
}

impl IngestionOutcome {
    pub fn drained(pages: u32) -> Self {
        Self {
            got_stuck: false,
            pages,
        }
    }

    pub fn stuck(pages: u32) -> Self {
        Self {
            got_stuck: true,
            pages,
        }
    }
}

/// Runs a full backfill of `[start, end)` from `source` into `sink`.
///
/// The known-id registry is seeded from the sink first; failing to read it is
/// fatal. Re-running over the same span is always safe.
pub async fn run_backfill(
    source: &dyn OrderSource,
    sink: &dyn OrderSink,
    settings: &IngestSettings,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<IngestionReport, AppError> {
    let mut known = KnownIdSet::seed_from(sink).await?;
    let mut report = IngestionReport {
        known_ids_at_start: known.len(),
        ..IngestionReport::default()
    };
    log::info!("Seeded {} known order ids from storage", known.len());

    let cursor = PageCursor::new(source, sink, settings);
    let scheduler = WindowScheduler::new(RangeBisector::new(cursor, settings));
    scheduler.run(start, end, &mut known, &mut report).await?;

    report.known_ids_at_end = known.len();
    report.stored_orders = match sink.order_count().await {
        Ok(count) => Some(count),
        Err(e) => {
            log::warn!("Could not count stored orders: {}", e);
            None
        }
    };

    Ok(report)
}
