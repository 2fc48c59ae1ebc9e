//! `stockroom-engine` — the inventory ledger and billing consistency engine.
//!
//! Consumed through the synchronous operations of [`InventoryService`]:
//! restock, list, edit, delete, bill generation, bill/purchase listing, and
//! the aggregated low-stock and summary reports. Presentation and transport
//! live outside this crate; persistence arrives through the `stockroom-store`
//! traits.

pub mod config;
pub mod error;
mod keylock;
pub mod request;
pub mod service;

pub use config::{EngineConfig, RestockPolicy, SalePriceSource};
pub use error::{EngineError, EngineResult};
pub use request::{BillRequest, ProductEdit, RestockRequest};
pub use service::{BillReceipt, InventoryService};
