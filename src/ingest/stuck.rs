// src/ingest/stuck.rs
//! Detection of pagination that keeps returning already-seen orders.

/// Counts consecutive full pages that brought no new orders.
#[derive(Debug, Clone)]
pub struct StuckDetector {
    threshold: u32,
    consecutive: u32,
}

impl StuckDetector {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            consecutive: 0,
        }
    }

    /// Feeds one full page; returns `true` once `threshold` consecutive full
    /// pages have yielded nothing new.
    pub fn observe_full_page(&mut self, new_orders: usize) -> bool {
        if new_orders > 0 {
            self.consecutive = 0;
            return false;
        }
        self.consecutive += 1;
        self.consecutive >= self.threshold
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }
}
