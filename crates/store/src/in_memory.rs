use std::sync::RwLock;

use stockroom_core::{BillId, ProductId, ProductKey, PurchaseId};
use stockroom_ledger::{Bill, Product, Purchase};

use crate::traits::{BillStore, ProductStore, PurchaseStore, StorageError};

fn poisoned() -> StorageError {
    StorageError::backend("lock poisoned")
}

/// In-memory product store.
///
/// Intended for tests/dev. Insertion order is preserved, which gives
/// `find_by_key` and `scan` their oldest-first contract.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductStore for InMemoryProductStore {
    fn insert(&self, product: Product) -> Result<(), StorageError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.push(product);
        Ok(())
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.iter().find(|p| p.id() == id).cloned())
    }

    fn find_by_key(&self, key: &ProductKey) -> Result<Vec<Product>, StorageError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.iter().filter(|p| p.key() == key).cloned().collect())
    }

    fn update(&self, product: Product) -> Result<bool, StorageError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        match rows.iter_mut().find(|p| p.id() == product.id()) {
            Some(slot) => {
                *slot = product;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: ProductId) -> Result<bool, StorageError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let before = rows.len();
        rows.retain(|p| p.id() != id);
        Ok(rows.len() != before)
    }

    fn scan(&self) -> Result<Vec<Product>, StorageError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.clone())
    }
}

/// In-memory append-only bill ledger.
#[derive(Debug, Default)]
pub struct InMemoryBillStore {
    rows: RwLock<Vec<Bill>>,
}

impl InMemoryBillStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BillStore for InMemoryBillStore {
    fn append(&self, bill: Bill) -> Result<(), StorageError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.push(bill);
        Ok(())
    }

    fn get(&self, id: BillId) -> Result<Option<Bill>, StorageError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.iter().find(|b| b.id() == id).cloned())
    }

    fn scan(&self) -> Result<Vec<Bill>, StorageError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.clone())
    }
}

/// In-memory append-only purchase ledger.
#[derive(Debug, Default)]
pub struct InMemoryPurchaseStore {
    rows: RwLock<Vec<Purchase>>,
}

impl InMemoryPurchaseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PurchaseStore for InMemoryPurchaseStore {
    fn append(&self, purchase: Purchase) -> Result<(), StorageError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.push(purchase);
        Ok(())
    }

    fn get(&self, id: PurchaseId) -> Result<Option<Purchase>, StorageError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.iter().find(|p| p.id() == id).cloned())
    }

    fn scan(&self) -> Result<Vec<Purchase>, StorageError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

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
    fn insert_then_get_by_id() {
        let store = InMemoryProductStore::new();
        let p = product("Silk-A", 150);
        store.insert(p.clone()).unwrap();
        assert_eq!(store.get(p.id()).unwrap(), Some(p));
    }

    #[test]
    fn find_by_key_returns_fragments_oldest_first() {
        let store = InMemoryProductStore::new();
        let first = product("Silk-A", 150);
        let second = product("Silk-A", 20);
        let other = product("Silk-B", 5);
        store.insert(first.clone()).unwrap();
        store.insert(other).unwrap();
        store.insert(second.clone()).unwrap();

        let fragments = store.find_by_key(first.key()).unwrap();
        assert_eq!(fragments, vec![first, second]);
    }

    #[test]
    fn update_replaces_matching_id_only() {
        let store = InMemoryProductStore::new();
        let mut p = product("Silk-A", 150);
        store.insert(p.clone()).unwrap();

        p.deduct(50).unwrap();
        assert!(store.update(p.clone()).unwrap());
        assert_eq!(store.get(p.id()).unwrap().unwrap().quantity(), 100);

        let stranger = product("Silk-B", 1);
        assert!(!store.update(stranger).unwrap());
    }

    #[test]
    fn delete_removes_one_record_not_siblings() {
        let store = InMemoryProductStore::new();
        let first = product("Silk-A", 150);
        let second = product("Silk-A", 20);
        store.insert(first.clone()).unwrap();
        store.insert(second.clone()).unwrap();

        assert!(store.delete(first.id()).unwrap());
        assert!(!store.delete(first.id()).unwrap());

        let fragments = store.find_by_key(second.key()).unwrap();
        assert_eq!(fragments, vec![second]);
    }

    #[test]
    fn bill_ledger_is_append_only_and_ordered() {
        let store = InMemoryBillStore::new();
        let key = ProductKey::new("Silk-A", "MfgX").unwrap();
        let a = Bill::new(BillId::new(), key.clone(), 1, 10, Utc::now()).unwrap();
        let b = Bill::new(BillId::new(), key, 2, 10, Utc::now()).unwrap();
        store.append(a.clone()).unwrap();
        store.append(b.clone()).unwrap();

        assert_eq!(store.scan().unwrap(), vec![a.clone(), b]);
        assert_eq!(store.get(a.id()).unwrap(), Some(a));
    }
}
