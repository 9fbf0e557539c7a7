// src/ingest/report.rs
//! Counters describing what one backfill run did.

use crate::types::TimeWindow;
use std::fmt;

/// Why a window was given up on without being fully drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    /// The window was still stuck past the maximum bisection depth.
    DepthExhausted,
    /// The window was stuck but too narrow to split further.
    Indivisible,
}

impl fmt::Display for AbandonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DepthExhausted => write!(f, "maximum bisection depth exceeded"),
            Self::Indivisible => write!(f, "window too narrow to bisect"),
        }
    }
}

/// A window whose orders may be missing from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbandonedWindow {
    pub window: TimeWindow,
    pub depth: u32,
    pub reason: AbandonReason,
}

/// Run summary accumulated by the ingestion components.
#[derive(Debug, Clone, Default)]
pub struct IngestionReport {
    pub windows_scheduled: usize,
    pub windows_drained: usize,
    pub bisections: usize,
    pub pages_fetched: usize,
    pub orders_ingested: usize,
    pub upstream_failures: usize,
    pub sink_failures: usize,
    pub known_ids_at_start: usize,
    pub known_ids_at_end: usize,
    pub stored_orders: Option<u64>,
    pub abandoned: Vec<AbandonedWindow>,
}

impl IngestionReport {
    /// Whether every scheduled window was drained without abandonment.
    pub fn is_complete(&self) -> bool {
        self.abandoned.is_empty()
    }
}
