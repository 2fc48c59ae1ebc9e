//! `stockroom-store` — the abstract persistence boundary.
//!
//! The engine is specified against these traits, not a concrete database.
//! Three record kinds, three stores: products (full CRUD + scan), bills and
//! purchases (append-only ledgers). The in-memory implementations back tests
//! and development.

mod in_memory;
mod traits;

pub use in_memory::{InMemoryBillStore, InMemoryProductStore, InMemoryPurchaseStore};
pub use traits::{BillStore, ProductStore, PurchaseStore, StorageError};
