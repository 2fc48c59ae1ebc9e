use std::sync::Arc;

use thiserror::Error;

use stockroom_core::{BillId, ProductId, ProductKey, PurchaseId};
use stockroom_ledger::{Bill, Product, Purchase};

/// Storage-layer fault.
///
/// Surfaced as-is to the caller; the engine never retries silently. Retry
/// policy is a caller-level concern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,

    #[error("storage backend fault: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Durable mapping from product record identity to stock attributes.
///
/// Exclusively owns the authoritative quantity: current stock is whatever
/// this store holds after the last committed mutation, never a replay of the
/// bill or purchase logs.
pub trait ProductStore: Send + Sync {
    fn insert(&self, product: Product) -> Result<(), StorageError>;

    /// Point lookup by store-assigned id.
    fn get(&self, id: ProductId) -> Result<Option<Product>, StorageError>;

    /// All fragments carrying this identity key, oldest insertion first.
    fn find_by_key(&self, key: &ProductKey) -> Result<Vec<Product>, StorageError>;

    /// Replace the record with the same id. `Ok(false)` when the id is unknown.
    fn update(&self, product: Product) -> Result<bool, StorageError>;

    /// Remove exactly the record with this id. `Ok(false)` when unknown.
    fn delete(&self, id: ProductId) -> Result<bool, StorageError>;

    /// Full snapshot, oldest insertion first.
    fn scan(&self) -> Result<Vec<Product>, StorageError>;
}

/// Append-only ledger of completed sales.
pub trait BillStore: Send + Sync {
    fn append(&self, bill: Bill) -> Result<(), StorageError>;

    /// Point lookup by id; the reconciliation probe after a commit fault.
    fn get(&self, id: BillId) -> Result<Option<Bill>, StorageError>;

    fn scan(&self) -> Result<Vec<Bill>, StorageError>;
}

/// Append-only ledger of restock events.
pub trait PurchaseStore: Send + Sync {
    fn append(&self, purchase: Purchase) -> Result<(), StorageError>;

    fn get(&self, id: PurchaseId) -> Result<Option<Purchase>, StorageError>;

    fn scan(&self) -> Result<Vec<Purchase>, StorageError>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn insert(&self, product: Product) -> Result<(), StorageError> {
        (**self).insert(product)
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        (**self).get(id)
    }

    fn find_by_key(&self, key: &ProductKey) -> Result<Vec<Product>, StorageError> {
        (**self).find_by_key(key)
    }

    fn update(&self, product: Product) -> Result<bool, StorageError> {
        (**self).update(product)
    }

    fn delete(&self, id: ProductId) -> Result<bool, StorageError> {
        (**self).delete(id)
    }

    fn scan(&self) -> Result<Vec<Product>, StorageError> {
        (**self).scan()
    }
}

impl<S> BillStore for Arc<S>
where
    S: BillStore + ?Sized,
{
    fn append(&self, bill: Bill) -> Result<(), StorageError> {
        (**self).append(bill)
    }

    fn get(&self, id: BillId) -> Result<Option<Bill>, StorageError> {
        (**self).get(id)
    }

    fn scan(&self) -> Result<Vec<Bill>, StorageError> {
        (**self).scan()
    }
}

impl<S> PurchaseStore for Arc<S>
where
    S: PurchaseStore + ?Sized,
{
    fn append(&self, purchase: Purchase) -> Result<(), StorageError> {
        (**self).append(purchase)
    }

    fn get(&self, id: PurchaseId) -> Result<Option<Purchase>, StorageError> {
        (**self).get(id)
    }

    fn scan(&self) -> Result<Vec<Purchase>, StorageError> {
        (**self).scan()
    }
}
