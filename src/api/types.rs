// src/api/types.rs
//! Wire types for the order search endpoint.

use crate::constants::{SEARCHED_ORDER_STATUSES, SEARCH_PAGE_SIZE};
use crate::types::{format_instant, TimeWindow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub current_page: u32,
    pub items_per_page: usize,
    pub data: SearchFilter,
}

/// Creation-date and status filter of a search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    pub created_after: String,
    pub created_before: String,
    pub status: Vec<i64>,
}

impl SearchRequest {
    /// Builds the request for one page of a window.
    pub fn for_window(window: &TimeWindow, page: u32) -> Self {
        Self {
            current_page: page,
            items_per_page: SEARCH_PAGE_SIZE,
            data: SearchFilter {
                created_after: format_instant(window.from()),
                created_before: format_instant(window.to()),
                status: SEARCHED_ORDER_STATUSES.to_vec(),
            },
        }
    }
}

/// Envelope of a search response.
///
/// Records are kept as raw values here and decoded one by one in the parser
/// so a bad record can be reported by position.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<Vec<Value>>,
}
