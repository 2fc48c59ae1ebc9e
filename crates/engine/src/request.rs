//! Validated request shapes at the engine boundary.
//!
//! The original data model accepted free-form records with any field absent;
//! here every request is strictly shaped and rejected as `InvalidInput`
//! before storage is touched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::ProductKey;

use crate::error::{EngineError, EngineResult};

/// RestockAdd: create or merge stock for one identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockRequest {
    pub product_name: String,
    pub manufacturer: String,
    pub quantity: u64,
    pub unit_amount: u64,
    /// Client-supplied event time; defaults to the engine clock.
    pub date: Option<DateTime<Utc>>,
}

impl RestockRequest {
    pub(crate) fn validate(&self) -> EngineResult<ProductKey> {
        if self.quantity == 0 {
            return Err(EngineError::invalid_input("quantity must be positive"));
        }
        if self.unit_amount == 0 {
            return Err(EngineError::invalid_input("unit amount must be positive"));
        }
        Ok(ProductKey::new(&self.product_name, &self.manufacturer)?)
    }
}

/// BillGenerate: sell against one identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRequest {
    pub product_name: String,
    /// Optional: when absent the name must resolve to a single manufacturer.
    pub manufacturer: Option<String>,
    pub quantity: u64,
    /// Required when the engine prices sales from the request.
    pub unit_amount: Option<u64>,
}

impl BillRequest {
    pub(crate) fn validate(&self) -> EngineResult<()> {
        if self.quantity == 0 {
            return Err(EngineError::invalid_input("quantity must be positive"));
        }
        if self.product_name.trim().is_empty() {
            return Err(EngineError::invalid_input("product name cannot be empty"));
        }
        if self.unit_amount == Some(0) {
            return Err(EngineError::invalid_input("unit amount must be positive"));
        }
        Ok(())
    }
}

/// ProductEdit: replace the full field set of one record by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEdit {
    pub product_name: String,
    pub manufacturer: String,
    /// Zero is allowed: an edit may correct a record down to sold out.
    pub quantity: u64,
    pub unit_amount: u64,
    pub date: Option<DateTime<Utc>>,
}

impl ProductEdit {
    pub(crate) fn validate(&self) -> EngineResult<ProductKey> {
        if self.unit_amount == 0 {
            return Err(EngineError::invalid_input("unit amount must be positive"));
        }
        Ok(ProductKey::new(&self.product_name, &self.manufacturer)?)
    }
}
