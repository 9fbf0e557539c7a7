// src/ingest/cursor.rs
//! Paging through one window until it is exhausted or stuck.

use super::registry::KnownIdSet;
use super::report::IngestionReport;
use super::stuck::StuckDetector;
use super::{IngestSettings, IngestionOutcome};
use crate::api::OrderSource;
use crate::model::OrderRecord;
use crate::store::OrderSink;
use crate::types::TimeWindow;

/// Reads the pages of a window in order and hands unseen orders to the sink.
pub struct PageCursor<'a> {
    source: &'a dyn OrderSource,
    sink: &'a dyn OrderSink,
    page_size: usize,
    stuck_threshold: u32,
}

impl<'a> PageCursor<'a> {
    pub fn new(
        source: &'a dyn OrderSource,
        sink: &'a dyn OrderSink,
        settings: &IngestSettings,
    ) -> Self {
        Self {
            source,
            sink,
            page_size: settings.page_size,
            stuck_threshold: settings.stuck_threshold,
        }
    }

    /// Drains `window` page by page.
    ///
    /// Ends unstuck on an empty page (an upstream failure counts as one) or a
    /// short page. Ends stuck, without reading further, once the stuck
    /// threshold of consecutive full pages bring nothing new.
    pub async fn drain(
        &self,
        window: &TimeWindow,
        known: &mut KnownIdSet,
        report: &mut IngestionReport,
    ) -> IngestionOutcome {
        let mut detector = StuckDetector::new(self.stuck_threshold);
        let mut page = 1u32;

        report.windows_drained += 1;

        loop {
            let orders = self.fetch(window, page, report).await;
            report.pages_fetched += 1;

            if orders.is_empty() {
                log::debug!("{} exhausted at page {} (empty)", window, page);
                return IngestionOutcome::drained(page);
            }

            let new_orders = self.ingest_page(&orders, known, report).await;
            log::debug!(
                "{} page {}: {} orders, {} new",
                window,
                page,
                orders.len(),
                new_orders
            );

            if orders.len() < self.page_size {
                log::debug!("{} exhausted at page {} (short page)", window, page);
                return IngestionOutcome::drained(page);
            }

            if detector.observe_full_page(new_orders) {
                log::info!(
                    "{} stuck at page {}: {} consecutive full pages without new orders",
                    window,
                    page,
                    detector.consecutive()
                );
                return IngestionOutcome::stuck(page);
            }

            page += 1;
        }
    }

    /// Fetches one page, downgrading any failure to an empty page.
    async fn fetch(
        &self,
        window: &TimeWindow,
        page: u32,
        report: &mut IngestionReport,
    ) -> Vec<OrderRecord> {
        match self.source.search_page(window, page).await {
            Ok(orders) => orders,
            Err(e) => {
                report.upstream_failures += 1;
                log::warn!(
                    "Search failed for {} page {} ({}): {}; treating as empty page",
                    window,
                    page,
                    e.upstream_category(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Submits the unseen orders of a page in upstream order; returns how
    /// many of them the sink accepted.
    async fn ingest_page(
        &self,
        orders: &[OrderRecord],
        known: &mut KnownIdSet,
        report: &mut IngestionReport,
    ) -> usize {
        let mut new_orders = 0;

        for order in orders {
            if known.contains(&order.id) {
                continue;
            }

            // A rejected order is no progress; a page of them still reads as stuck
            match self.sink.upsert(order).await {
                Ok(()) => {
                    new_orders += 1;
                    known.insert(order.id.clone());
                    report.orders_ingested += 1;
                }
                Err(e) => {
                    // Left out of the known set so the next run retries it
                    report.sink_failures += 1;
                    log::error!("Failed to store order {}: {}", order.id, e);
                }
            }
        }

        new_orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::types::{parse_instant, OrderId};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::collections::VecDeque;

    /// Serves a fixed sequence of pages regardless of the window asked for.
    struct ScriptedSource {
        pages: Mutex<VecDeque<Result<Vec<OrderRecord>, AppError>>>,
        requested: Mutex<Vec<u32>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Result<Vec<OrderRecord>, AppError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl OrderSource for ScriptedSource {
        async fn search_page(
            &self,
            _window: &TimeWindow,
            page: u32,
        ) -> Result<Vec<OrderRecord>, AppError> {
            self.requested.lock().push(page);
            self.pages.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    /// Records submissions; rejects ids listed in `reject`.
    #[derive(Default)]
    struct RecordingSink {
        submitted: Mutex<Vec<String>>,
        reject: Vec<String>,
    }

    #[async_trait::async_trait]
    impl OrderSink for RecordingSink {
        async fn upsert(&self, order: &OrderRecord) -> Result<(), AppError> {
            self.submitted.lock().push(order.id.to_string());
            if self.reject.contains(&order.id.to_string()) {
                return Err(AppError::MalformedResponse("disk full".to_string()));
            }
            Ok(())
        }

        async fn known_ids(&self) -> Result<Vec<OrderId>, AppError> {
            Ok(Vec::new())
        }

        async fn order_count(&self) -> Result<u64, AppError> {
            Ok(self.submitted.lock().len() as u64)
        }
    }

    fn orders(ids: std::ops::Range<usize>) -> Vec<OrderRecord> {
        ids.map(|id| {
            serde_json::from_value(json!({
                "id": id, "status": 1, "createdAt": "2024-12-12 10:00:00"
            }))
            .unwrap()
        })
        .collect()
    }

    fn settings() -> IngestSettings {
        IngestSettings {
            page_size: 3,
            ..IngestSettings::default()
        }
    }

    fn window() -> TimeWindow {
        TimeWindow::new(
            parse_instant("2024-12-10").unwrap(),
            parse_instant("2025-01-10").unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn short_page_ends_the_window() {
        let source = ScriptedSource::new(vec![Ok(orders(0..3)), Ok(orders(3..5))]);
        let sink = RecordingSink::default();
        let mut known = KnownIdSet::new();
        let mut report = IngestionReport::default();

        let outcome = PageCursor::new(&source, &sink, &settings())
            .drain(&window(), &mut known, &mut report)
            .await;

        assert!(!outcome.got_stuck);
        assert_eq!(*source.requested.lock(), vec![1, 2]);
        assert_eq!(known.len(), 5);
        assert_eq!(report.orders_ingested, 5);
    }

    #[tokio::test]
    async fn known_orders_are_never_resubmitted() {
        let source = ScriptedSource::new(vec![Ok(orders(0..3)), Ok(orders(1..3))]);
        let sink = RecordingSink::default();
        let mut known: KnownIdSet = [OrderId::parse("0").unwrap()].into_iter().collect();
        let mut report = IngestionReport::default();

        PageCursor::new(&source, &sink, &settings())
            .drain(&window(), &mut known, &mut report)
            .await;

        assert_eq!(*sink.submitted.lock(), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn stuck_after_three_repeated_full_pages() {
        let source = ScriptedSource::new(vec![
            Ok(orders(0..3)),
            Ok(orders(1..4)),
            Ok(orders(1..4)),
            Ok(orders(1..4)),
            Ok(orders(1..4)),
            Ok(orders(10..13)),
        ]);
        let sink = RecordingSink::default();
        let mut known = KnownIdSet::new();
        let mut report = IngestionReport::default();

        let outcome = PageCursor::new(&source, &sink, &settings())
            .drain(&window(), &mut known, &mut report)
            .await;

        assert!(outcome.got_stuck);
        assert_eq!(outcome.pages, 5);
        assert_eq!(*source.requested.lock(), vec![1, 2, 3, 4, 5]);
        assert_eq!(known.len(), 4);
    }

    #[tokio::test]
    async fn upstream_failure_counts_as_empty_page() {
        let source = ScriptedSource::new(vec![
            Ok(orders(0..3)),
            Err(AppError::UpstreamFlagged {
                message: "maintenance".to_string(),
            }),
            Ok(orders(3..6)),
        ]);
        let sink = RecordingSink::default();
        let mut known = KnownIdSet::new();
        let mut report = IngestionReport::default();

        let outcome = PageCursor::new(&source, &sink, &settings())
            .drain(&window(), &mut known, &mut report)
            .await;

        assert!(!outcome.got_stuck);
        assert_eq!(report.upstream_failures, 1);
        assert_eq!(known.len(), 3);
    }

    #[tokio::test]
    async fn failed_write_keeps_order_unknown_and_page_going() {
        let source = ScriptedSource::new(vec![Ok(orders(0..2))]);
        let sink = RecordingSink {
            reject: vec!["0".to_string()],
            ..RecordingSink::default()
        };
        let mut known = KnownIdSet::new();
        let mut report = IngestionReport::default();

        PageCursor::new(&source, &sink, &settings())
            .drain(&window(), &mut known, &mut report)
            .await;

        assert_eq!(*sink.submitted.lock(), vec!["0", "1"]);
        assert!(!known.contains(&OrderId::parse("0").unwrap()));
        assert!(known.contains(&OrderId::parse("1").unwrap()));
        assert_eq!(report.sink_failures, 1);
        assert_eq!(report.orders_ingested, 1);
    }

    #[tokio::test]
    async fn repeated_page_with_rejected_order_still_gets_stuck() {
        let source = ScriptedSource::new((0..10).map(|_| Ok(orders(0..3))).collect());
        let sink = RecordingSink {
            reject: vec!["2".to_string()],
            ..RecordingSink::default()
        };
        let mut known = KnownIdSet::new();
        let mut report = IngestionReport::default();

        let outcome = PageCursor::new(&source, &sink, &settings())
            .drain(&window(), &mut known, &mut report)
            .await;

        // Page 1 stores 0 and 1; pages 2, 3 and 4 only retry the rejected order.
        assert!(outcome.got_stuck);
        assert_eq!(outcome.pages, 4);
        assert_eq!(*source.requested.lock(), vec![1, 2, 3, 4]);
        assert_eq!(report.sink_failures, 4);
        assert!(!known.contains(&OrderId::parse("2").unwrap()));
    }
}
