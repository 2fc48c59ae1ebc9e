//! Engine configuration.
//!
//! The source history of this system ran two incompatible restock policies
//! and two sale pricing rules at different times. Both are legitimate, so
//! they are explicit configuration here; the engine applies whichever is
//! chosen uniformly to restocking, sale resolution, and reporting.

use serde::{Deserialize, Serialize};

use stockroom_ledger::DEFAULT_LOW_STOCK_THRESHOLD;

/// What a restock request does when the identity key already holds stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestockPolicy {
    /// Fold the restock into the existing record; point lookups stay correct.
    #[default]
    MergeOnIdentity,
    /// Every restock creates a fresh record; only the aggregated view is
    /// correct, and sales draw across fragments oldest-first.
    AlwaysInsert,
}

/// Where the unit price on a generated bill comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalePriceSource {
    /// Copy the stored product's current price at sale time.
    #[default]
    ProductPrice,
    /// Take the price supplied on the bill request.
    RequestPrice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub restock_policy: RestockPolicy,
    pub sale_price_source: SalePriceSource,
    /// Aggregated quantities strictly below this trigger a low-stock alert.
    pub low_stock_threshold: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            restock_policy: RestockPolicy::default(),
            sale_price_source: SalePriceSource::default(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}
