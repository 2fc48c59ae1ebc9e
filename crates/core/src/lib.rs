//! `stockroom-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the product identity key, the domain error
//! model, and the clock seam used for timestamping.

pub mod clock;
pub mod error;
pub mod id;
pub mod key;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{DomainError, DomainResult};
pub use id::{BillId, ProductId, PurchaseId};
pub use key::ProductKey;
