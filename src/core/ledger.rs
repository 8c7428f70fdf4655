//! # History Ledger
//!
//! Append-only log of classifications for the current session. Insertion
//! order is chronological order is undo order.
//!
//! Undo pops the newest record. It does not touch the album the photo was
//! routed to: the ledger drives sequencing and the visible history, the
//! repository keeps the placement.

use crate::core::model::{ClassificationRecord, Outcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortingStats {
    pub positive: usize,
    pub negative: usize,
    pub total_seen: usize,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    records: Vec<ClassificationRecord>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ClassificationRecord) {
        self.records.push(record);
    }

    pub fn pop_last(&mut self) -> Option<ClassificationRecord> {
        self.records.pop()
    }

    /// Oldest first.
    pub fn records(&self) -> &[ClassificationRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&ClassificationRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn stats(&self) -> SortingStats {
        let positive = self
            .records
            .iter()
            .filter(|r| r.outcome == Outcome::Keep)
            .count();
        SortingStats {
            positive,
            negative: self.records.len() - positive,
            total_seen: self.records.len(),
        }
    }
}
