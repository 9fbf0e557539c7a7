// src/store/mod.rs
//! Durable order storage: the ingestion sink and the source of known ids.

mod sqlite;

use crate::error::AppError;
use crate::model::OrderRecord;
use crate::types::OrderId;

pub use sqlite::SqliteOrderStore;

/// The ability to persist orders idempotently.
///
/// # Laws
///
/// - **Idempotent replace**: upserting the same order id twice leaves exactly
///   one stored order carrying the values of the last call.
/// - **Listing completeness**: every id whose `upsert` returned `Ok` appears
///   in `known_ids`.
#[async_trait::async_trait]
pub trait OrderSink: Send + Sync {
    /// Inserts or replaces an order and its line items.
    async fn upsert(&self, order: &OrderRecord) -> Result<(), AppError>;

    /// Lists the id of every stored order.
    async fn known_ids(&self) -> Result<Vec<OrderId>, AppError>;

    /// Number of stored orders.
    async fn order_count(&self) -> Result<u64, AppError>;
}
