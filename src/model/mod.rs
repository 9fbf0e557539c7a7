// src/model/mod.rs
//! Order records as returned by the search API.
//!
//! Only the fields the backfill reasons about are typed. Everything else the
//! upstream sends is kept verbatim, in upstream order, in `extra` and written
//! back out unchanged when the record is stored.

mod serde_helpers;

use crate::types::{Flag, ItemId, OrderId};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One order from the search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: OrderId,
    #[serde(with = "serde_helpers::status_code")]
    pub status: i64,
    #[serde(alias = "created_at", with = "serde_helpers::instant")]
    pub created_at: DateTime<Utc>,
    #[serde(
        alias = "updated_at",
        default,
        with = "serde_helpers::optional_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Remaining upstream attributes (vendor, payment, addresses, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One line item nested in an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ItemId,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl OrderRecord {
    /// Looks up an untyped upstream attribute.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Tri-state reading of a yes/no attribute; missing attributes are unknown.
    pub fn flag(&self, name: &str) -> Flag {
        self.attribute(name)
            .map(Flag::from_value)
            .unwrap_or(Flag::Unknown)
    }
}
