// src/ingest/bisector.rs
//! Halving stuck windows until their pagination becomes reliable.

use super::cursor::PageCursor;
use super::registry::KnownIdSet;
use super::report::{AbandonReason, AbandonedWindow, IngestionReport};
use super::{DepthExhaustionPolicy, IngestSettings};
use crate::error::AppError;
use crate::types::{format_instant, TimeWindow};

/// Drains a window, splitting it at its midpoint whenever it gets stuck.
///
/// Pending windows live on an explicit stack. The later half is pushed first,
/// so the earlier half and everything it splits into are drained before the
/// later half starts.
pub struct RangeBisector<'a> {
    cursor: PageCursor<'a>,
    max_depth: u32,
    policy: DepthExhaustionPolicy,
}

impl<'a> RangeBisector<'a> {
    pub fn new(cursor: PageCursor<'a>, settings: &IngestSettings) -> Self {
        Self {
            cursor,
            max_depth: settings.max_depth,
            policy: settings.on_depth_exhausted,
        }
    }

    /// Ingests `window` starting at bisection `depth`.
    ///
    /// Only fails when a window is abandoned under
    /// [`DepthExhaustionPolicy::Abort`].
    pub async fn ingest(
        &self,
        window: TimeWindow,
        depth: u32,
        known: &mut KnownIdSet,
        report: &mut IngestionReport,
    ) -> Result<(), AppError> {
        let mut pending = vec![(window, depth)];

        while let Some((window, depth)) = pending.pop() {
            if depth > self.max_depth {
                self.abandon(window, depth, AbandonReason::DepthExhausted, report)?;
                continue;
            }

            let outcome = self.cursor.drain(&window, known, report).await;
            if !outcome.got_stuck {
                continue;
            }

            match window.bisect() {
                Some((early, late)) => {
                    report.bisections += 1;
                    log::info!(
                        "Bisecting {} at {} (depth {} -> {})",
                        window,
                        format_instant(early.to()),
                        depth,
                        depth + 1
                    );
                    pending.push((late, depth + 1));
                    pending.push((early, depth + 1));
                }
                None => self.abandon(window, depth, AbandonReason::Indivisible, report)?,
            }
        }

        Ok(())
    }

    fn abandon(
        &self,
        window: TimeWindow,
        depth: u32,
        reason: AbandonReason,
        report: &mut IngestionReport,
    ) -> Result<(), AppError> {
        log::warn!(
            "ABANDONED window {} at depth {} ({}); orders created in it may be missing",
            window,
            depth,
            reason
        );
        report.abandoned.push(AbandonedWindow {
            window,
            depth,
            reason,
        });

        match self.policy {
            DepthExhaustionPolicy::Log => Ok(()),
            DepthExhaustionPolicy::Abort => Err(AppError::WindowAbandoned { window, depth }),
        }
    }
}
