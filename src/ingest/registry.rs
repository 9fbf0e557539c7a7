// src/ingest/registry.rs
//! In-memory mirror of order ids already in storage.

use crate::error::AppError;
use crate::store::OrderSink;
use crate::types::OrderId;
use std::collections::HashSet;

/// Ids of orders already durably stored, for the lifetime of one run.
///
/// Seeded once from the sink's full listing and only ever grown afterwards.
/// It is an optimization, not the source of truth: the sink stays idempotent
/// because another run may have stored orders this set never saw.
#[derive(Debug, Clone, Default)]
pub struct KnownIdSet {
    ids: HashSet<OrderId>,
}

impl KnownIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every stored id. A failure here leaves the run without a safe
    /// baseline, so callers treat it as fatal.
    pub async fn seed_from(sink: &dyn OrderSink) -> Result<Self, AppError> {
        let ids = sink.known_ids().await?;
        Ok(ids.into_iter().collect())
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.ids.contains(id)
    }

    /// Records an id; returns `false` if it was already known.
    pub fn insert(&mut self, id: OrderId) -> bool {
        self.ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<OrderId> for KnownIdSet {
    fn from_iter<I: IntoIterator<Item = OrderId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
