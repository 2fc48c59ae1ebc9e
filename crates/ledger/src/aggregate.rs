//! Per-key aggregation over fragmented records.
//!
//! A pure, stateless function over a snapshot: no process-wide caches, no
//! interior mutability. For a fixed input collection, repeated invocation
//! yields identical output; entry order is the insertion order of each key's
//! first occurrence, which keeps report snapshots deterministic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stockroom_core::ProductKey;

use crate::record::StockRecord;

/// Totals for one identity key.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTotals {
    pub total_quantity: u64,
    /// Σ quantity_i * unit_amount_i, widened to u128 so sums cannot overflow.
    pub total_amount: u128,
}

/// Aggregated per-key view, ordered by first occurrence of each key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockSummary {
    entries: Vec<(ProductKey, StockTotals)>,
    index: HashMap<ProductKey, usize>,
}

impl StockSummary {
    pub fn get(&self, key: &ProductKey) -> Option<StockTotals> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, key: &ProductKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ProductKey, StockTotals)> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[(ProductKey, StockTotals)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(ProductKey, StockTotals)> {
        self.entries
    }

    fn absorb<R: StockRecord>(&mut self, record: &R) {
        let slot = match self.index.get(record.key()) {
            Some(&i) => i,
            None => {
                self.entries
                    .push((record.key().clone(), StockTotals::default()));
                let i = self.entries.len() - 1;
                self.index.insert(record.key().clone(), i);
                i
            }
        };

        let totals = &mut self.entries[slot].1;
        totals.total_quantity = totals.total_quantity.saturating_add(record.quantity());
        totals.total_amount += record.line_total();
    }
}

/// Collapse a collection of records into per-key totals.
///
/// Zero-quantity records still surface their key; an identity key appears in
/// the summary exactly when at least one record carries it.
pub fn aggregate<'a, R, I>(records: I) -> StockSummary
where
    R: StockRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut summary = StockSummary::default();
    for record in records {
        summary.absorb(record);
    }
    summary
}
