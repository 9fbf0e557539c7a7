// src/api/mod.rs
//! Order search API interaction: the ability to read one page of a window.
//!
//! Business logic depends on [`OrderSource`], never on HTTP details, so the
//! ingestion core can be driven by a scripted source in tests.

pub mod client;
pub mod parser;
pub mod types;

use crate::error::AppError;
use crate::model::OrderRecord;
use crate::types::TimeWindow;

/// The ability to search orders created within a time window.
#[async_trait::async_trait]
pub trait OrderSource: Send + Sync {
    /// Fetches one page (1-based) of orders created within `window`.
    ///
    /// A page shorter than the page size marks the end of the window's
    /// results. Any upstream failure is reported as an error; the caller
    /// decides how to degrade.
    async fn search_page(
        &self,
        window: &TimeWindow,
        page: u32,
    ) -> Result<Vec<OrderRecord>, AppError>;
}

pub use client::{ApiResponse, OrderSearchClient};
