//! Product identity key.
//!
//! Two stock records refer to the same logical product exactly when their
//! identity keys are equal. Matching is case-sensitive on the trimmed
//! originals; no further normalization is applied.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The `(product_name, manufacturer)` pair that identifies a logical product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    product_name: String,
    manufacturer: String,
}

impl ProductKey {
    /// Build a key from raw input, trimming surrounding whitespace.
    ///
    /// Either part being empty after trimming is a validation failure.
    pub fn new(
        product_name: impl Into<String>,
        manufacturer: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let product_name = product_name.into().trim().to_string();
        let manufacturer = manufacturer.into().trim().to_string();

        if product_name.is_empty() {
            return Err(DomainError::invalid_input("product name cannot be empty"));
        }
        if manufacturer.is_empty() {
            return Err(DomainError::invalid_input("manufacturer cannot be empty"));
        }

        Ok(Self {
            product_name,
            manufacturer,
        })
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }
}

impl core::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.product_name, self.manufacturer)
    }
}
