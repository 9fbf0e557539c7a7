// src/lib.rs
//! order-backfill library. Captures every order of a historical span from a
//! time-windowed search API whose pagination stalls on dense windows.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `IngestConfig`, `CommandLineInput`
//! - **Domain model**: `OrderRecord`, `LineItem`, `TimeWindow`, `Flag`
//! - **Upstream**: `OrderSource`, `OrderSearchClient`, `parse_search_response`
//! - **Storage**: `OrderSink`, `SqliteOrderStore`
//! - **Ingestion**: `run_backfill`, `WindowScheduler`, `RangeBisector`, `PageCursor`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod ingest;
pub mod model;
pub mod store;
pub mod types;

// --- Error Handling ---
pub use crate::error::AppError;
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, IngestConfig};

// --- Domain Model ---
pub use crate::model::{LineItem, OrderRecord};
pub use crate::types::{
    format_instant, parse_instant, ApiKey, AuthHeaderName, Flag, ItemId, OrderId, TimeWindow,
    ValidatedUrl,
};

// --- Upstream ---
pub use crate::api::{parser::parse_search_response, ApiResponse, OrderSearchClient, OrderSource};

// --- Storage ---
pub use crate::store::{OrderSink, SqliteOrderStore};

// --- Ingestion ---
pub use crate::ingest::{
    run_backfill, AbandonReason, AbandonedWindow, DepthExhaustionPolicy, IngestSettings,
    IngestionOutcome, IngestionReport, KnownIdSet, MonthlyWindows, PageCursor, RangeBisector,
    StuckDetector, WindowScheduler,
};
