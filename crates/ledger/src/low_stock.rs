//! Low-stock evaluation over the aggregated view.

use serde::{Deserialize, Serialize};

use stockroom_core::ProductKey;

use crate::aggregate::aggregate;
use crate::record::StockRecord;

/// Cutoff below which a product triggers a restock alert.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u64 = 100;

/// One alert row: an identity key whose aggregated quantity sits below the
/// threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub key: ProductKey,
    pub total_quantity: u64,
}

/// Aggregate the records and keep every key strictly below `threshold`.
///
/// Zero-quantity keys are alerts too; a sold-out product is exactly what the
/// report exists to surface. Read-only, no side effects.
pub fn low_stock<'a, R, I>(records: I, threshold: u64) -> Vec<LowStockAlert>
where
    R: StockRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    aggregate(records)
        .into_entries()
        .into_iter()
        .filter(|(_, totals)| totals.total_quantity < threshold)
        .map(|(key, totals)| LowStockAlert {
            key,
            total_quantity: totals.total_quantity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use stockroom_core::ProductId;

    use super::*;
    use crate::record::Product;

    fn product(name: &str, quantity: u64) -> Product {
        Product::new(
            ProductId::new(),
            ProductKey::new(name, "MfgX").unwrap(),
            quantity,
            10,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn threshold_is_strict() {
        let records = vec![product("AtThreshold", 100), product("Below", 99)];
        let alerts = low_stock(&records, DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].key.product_name(), "Below");
        assert_eq!(alerts[0].total_quantity, 99);
    }

    #[test]
    fn sold_out_keys_are_included() {
        let records = vec![product("Empty", 0)];
        let alerts = low_stock(&records, DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].total_quantity, 0);
    }

    #[test]
    fn fragments_are_summed_before_filtering() {
        // Two fragments of 60 each: neither is low on its own view, and the
        // aggregate must not be reported either.
        let records = vec![product("Silk-A", 60), product("Silk-A", 60)];
        let alerts = low_stock(&records, DEFAULT_LOW_STOCK_THRESHOLD);
        assert!(alerts.is_empty());
    }

    #[test]
    fn empty_scan_yields_no_alerts() {
        let records: Vec<Product> = vec![];
        assert!(low_stock(&records, DEFAULT_LOW_STOCK_THRESHOLD).is_empty());
    }
}
