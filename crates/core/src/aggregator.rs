//! Rolling decision counters and bounded most-recent-first history.

use crate::types::{Decision, HistoryEntry, IngestionResult, PendingTransaction, RunningStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of history entries kept per run.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Point-in-time copy of the aggregate state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub stats: RunningStats,
    /// Most recent first.
    pub history: Vec<HistoryEntry>,
}

/// Folds scored transactions into running stats and a capped history.
///
/// Every mutation goes through `&mut self`, so a caller that guards the
/// aggregator with a single lock never exposes a half-applied update.
#[derive(Debug, Clone)]
pub struct RollingAggregator {
    stats: RunningStats,
    history: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for RollingAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl RollingAggregator {
    /// Creates an aggregator keeping `capacity` history entries.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            stats: RunningStats::default(),
            // Preallocation is capped; `capacity` only bounds truncation.
            history: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY) + 1),
            capacity,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Zeroes the counters and empties the history.
    pub fn reset(&mut self) {
        self.stats = RunningStats::default();
        self.history.clear();
    }

    /// Records one scored transaction, stamped with the current time.
    pub fn record(&mut self, tx: &PendingTransaction, result: &IngestionResult) -> &HistoryEntry {
        self.record_at(tx, result, Utc::now())
    }

    /// Records one scored transaction with an explicit capture time.
    ///
    /// `total` always advances. Exactly one of approve/review/block advances
    /// when the label matches it; `pending` and unrecognized labels count
    /// toward `total` only.
    pub fn record_at(
        &mut self,
        tx: &PendingTransaction,
        result: &IngestionResult,
        captured_at: DateTime<Utc>,
    ) -> &HistoryEntry {
        self.stats.total += 1;
        match result.decision {
            Decision::Approve => self.stats.approve += 1,
            Decision::Review => self.stats.review += 1,
            Decision::Block => self.stats.block += 1,
            Decision::Pending | Decision::Unrecognized(_) => {}
        }

        self.history
            .push_front(HistoryEntry::project(tx, result, captured_at));
        self.history.truncate(self.capacity);

        tracing::trace!(
            total = self.stats.total,
            decision = %result.decision,
            history_len = self.history.len(),
            "Recorded ingestion result"
        );

        // Non-empty: an entry was pushed and truncate keeps at least one.
        &self.history[0]
    }

    #[must_use]
    pub const fn stats(&self) -> RunningStats {
        self.stats
    }

    /// History, most recent first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.history.front()
    }

    #[must_use]
    pub fn snapshot(&self) -> AggregateSnapshot {
        AggregateSnapshot {
            stats: self.stats,
            history: self.history.iter().cloned().collect(),
        }
    }
}
