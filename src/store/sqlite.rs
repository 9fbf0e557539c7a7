// src/store/sqlite.rs
//! SQLite-backed order store.

use super::OrderSink;
use crate::constants::PAID_ATTRIBUTE;
use crate::error::AppError;
use crate::model::OrderRecord;
use crate::types::{format_instant, OrderId};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Arc;

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS orders (
        id          TEXT PRIMARY KEY NOT NULL,
        status      INTEGER NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT,
        paid        INTEGER,
        payload     TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS order_items (
        item_id     TEXT NOT NULL,
        order_id    TEXT NOT NULL REFERENCES orders(id),
        payload     TEXT NOT NULL,
        PRIMARY KEY (item_id, order_id)
    );

    CREATE INDEX IF NOT EXISTS idx_orders_created_at ON orders(created_at);
";

const UPSERT_ORDER: &str = "
    INSERT INTO orders (id, status, created_at, updated_at, paid, payload)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(id) DO UPDATE SET
        status = excluded.status,
        created_at = excluded.created_at,
        updated_at = excluded.updated_at,
        paid = excluded.paid,
        payload = excluded.payload
";

const UPSERT_ITEM: &str = "
    INSERT INTO order_items (item_id, order_id, payload)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(item_id, order_id) DO UPDATE SET
        payload = excluded.payload
";

/// Orders and their line items in two SQLite tables.
///
/// Every statement runs on tokio's blocking pool; the shared connection is
/// locked only inside that closure, never across an await.
pub struct SqliteOrderStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteOrderStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let conn = Connection::open(path)?;
        Self::bootstrap(conn)
    }

    pub fn in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self, AppError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `op` against the connection on the blocking threadpool.
    async fn run_blocking<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, AppError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            op(&mut guard)
        })
        .await?
    }
}

fn write_order(conn: &mut Connection, order: &OrderRecord) -> Result<(), AppError> {
    let payload = encode(order, order)?;
    let tx = conn.transaction()?;

    tx.execute(
        UPSERT_ORDER,
        params![
            order.id.as_str(),
            order.status,
            format_instant(order.created_at),
            order.updated_at.map(format_instant),
            order.flag(PAID_ATTRIBUTE).as_sql(),
            payload,
        ],
    )?;

    for item in &order.items {
        tx.execute(
            UPSERT_ITEM,
            params![item.id.as_str(), order.id.as_str(), encode(order, item)?],
        )?;
    }

    tx.commit()?;
    Ok(())
}

fn read_ids(conn: &mut Connection) -> Result<Vec<OrderId>, AppError> {
    let mut stmt = conn.prepare("SELECT id FROM orders")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let ids = rows
        .map(|row| row.map(OrderId::from_normalized))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

fn count_orders(conn: &mut Connection) -> Result<u64, AppError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

fn encode<T: serde::Serialize>(order: &OrderRecord, value: &T) -> Result<String, AppError> {
    serde_json::to_string(value).map_err(|source| AppError::Encoding {
        order_id: order.id.to_string(),
        source,
    })
}

#[async_trait::async_trait]
impl OrderSink for SqliteOrderStore {
    async fn upsert(&self, order: &OrderRecord) -> Result<(), AppError> {
        let order = order.clone();
        self.run_blocking(move |conn| write_order(conn, &order)).await
    }

    async fn known_ids(&self) -> Result<Vec<OrderId>, AppError> {
        self.run_blocking(read_ids).await
    }

    async fn order_count(&self) -> Result<u64, AppError> {
        self.run_blocking(count_orders).await
    }
}
