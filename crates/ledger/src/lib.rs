//! `stockroom-ledger` — the record model and the pure reporting functions.
//!
//! Holds the three record kinds (Product, Bill, Purchase), the aggregator
//! that collapses fragmented records into per-key totals, and the low-stock
//! evaluator built on top of it. Everything here is pure and storage-free.

pub mod aggregate;
pub mod low_stock;
pub mod record;

pub use aggregate::{StockSummary, StockTotals, aggregate};
pub use low_stock::{DEFAULT_LOW_STOCK_THRESHOLD, LowStockAlert, low_stock};
pub use record::{Bill, Product, Purchase, StockRecord};
