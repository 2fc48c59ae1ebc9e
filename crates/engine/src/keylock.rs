//! Per-identity-key serialization of mutations.
//!
//! The read-check-decrement-append sequence must be serialized per key;
//! operations on different keys must never contend, so there is no global
//! lock across the product table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stockroom_core::ProductKey;

#[derive(Debug, Default)]
pub(crate) struct KeyLocks {
    registry: Mutex<HashMap<ProductKey, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch (or create) the lock handle for one identity key.
    ///
    /// The registry only grows with the set of distinct keys ever mutated.
    pub fn handle(&self, key: &ProductKey) -> Arc<Mutex<()>> {
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        registry.entry(key.clone()).or_default().clone()
    }

    /// Fetch handles for several keys in a deterministic (sorted) order, so
    /// multi-key operations cannot deadlock each other.
    pub fn handles_ordered(&self, keys: &mut Vec<ProductKey>) -> Vec<Arc<Mutex<()>>> {
        keys.sort();
        keys.dedup();
        keys.iter().map(|key| self.handle(key)).collect()
    }
}

/// Lock a handle, treating a poisoned guard as still usable: the protected
/// state lives in the stores, not inside the mutex.
pub(crate) fn lock(handle: &Mutex<()>) -> MutexGuard<'_, ()> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_shares_one_handle() {
        let locks = KeyLocks::new();
        let key = ProductKey::new("Silk-A", "MfgX").unwrap();
        let a = locks.handle(&key);
        let b = locks.handle(&key);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_keys_do_not_share() {
        let locks = KeyLocks::new();
        let a = locks.handle(&ProductKey::new("Silk-A", "MfgX").unwrap());
        let b = locks.handle(&ProductKey::new("Silk-B", "MfgX").unwrap());
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn ordered_handles_deduplicate() {
        let locks = KeyLocks::new();
        let key = ProductKey::new("Silk-A", "MfgX").unwrap();
        let mut keys = vec![key.clone(), key];
        let handles = locks.handles_ordered(&mut keys);
        assert_eq!(handles.len(), 1);
    }
}
