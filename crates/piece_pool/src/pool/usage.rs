//! Per-generation occurrence counters.
use std::collections::HashMap;

use crate::piece::PieceId;

/// Counts how many times each piece has been placed in the current structure.
#[derive(Clone, Debug, Default)]
pub struct OccurrenceCounters {
    counts: HashMap<PieceId, u32>,
}

impl OccurrenceCounters {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    pub fn record(&mut self, piece: PieceId) {
        let count = self.counts.entry(piece).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn get(&self, piece: PieceId) -> u32 {
        self.counts.get(&piece).copied().unwrap_or(0)
    }

    /// Total number of placements recorded.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_clears() {
        let mut counters = OccurrenceCounters::new();
        counters.record(PieceId(1));
        counters.record(PieceId(1));
        counters.record(PieceId(2));
        assert_eq!(counters.get(PieceId(1)), 2);
        assert_eq!(counters.get(PieceId(3)), 0);
        assert_eq!(counters.total(), 3);
        counters.clear();
        assert_eq!(counters.get(PieceId(1)), 0);
        assert_eq!(counters.total(), 0);
    }
}
