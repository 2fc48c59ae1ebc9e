//! The three record kinds of the ledger.
//!
//! `Product` is the only mutable record and exclusively owns the
//! authoritative quantity for its identity key. `Bill` and `Purchase` are
//! write-once mirrors of sale and restock events; they are never a source of
//! truth for current stock.
//!
//! Monetary values are integers in the smallest currency unit. Every
//! constructor and mutator recomputes `total_amount` from
//! `quantity * unit_amount` with checked arithmetic; a derived total is never
//! trusted from input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{BillId, DomainError, DomainResult, ProductId, ProductKey, PurchaseId};

fn derive_total(quantity: u64, unit_amount: u64) -> DomainResult<u64> {
    quantity.checked_mul(unit_amount).ok_or_else(|| {
        DomainError::invalid_input(format!(
            "total amount overflows: {quantity} * {unit_amount}"
        ))
    })
}

/// Anything the aggregator can total: exposes the identity key plus one
/// quantity/price line.
pub trait StockRecord {
    fn key(&self) -> &ProductKey;
    fn quantity(&self) -> u64;
    fn unit_amount(&self) -> u64;

    /// Line value as `quantity * unit_amount`, widened so sums cannot overflow.
    fn line_total(&self) -> u128 {
        u128::from(self.quantity()) * u128::from(self.unit_amount())
    }
}

/// A stock-holding record.
///
/// Several `Product`s may share one identity key (fragmentation from
/// independent restocks under the always-insert policy); the aggregator
/// presents the unified view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    key: ProductKey,
    quantity: u64,
    unit_amount: u64,
    total_amount: u64,
    recorded_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: ProductId,
        key: ProductKey,
        quantity: u64,
        unit_amount: u64,
        recorded_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let total_amount = derive_total(quantity, unit_amount)?;
        Ok(Self {
            id,
            key,
            quantity,
            unit_amount,
            total_amount,
            recorded_at,
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn key(&self) -> &ProductKey {
        &self.key
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn unit_amount(&self) -> u64 {
        self.unit_amount
    }

    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Fold a restock into this record: quantity added, price refreshed to the
    /// latest restock's, timestamp refreshed.
    pub fn restock(
        &mut self,
        quantity: u64,
        unit_amount: u64,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let merged = self.quantity.checked_add(quantity).ok_or_else(|| {
            DomainError::invalid_input(format!(
                "quantity overflows: {} + {quantity}",
                self.quantity
            ))
        })?;
        self.total_amount = derive_total(merged, unit_amount)?;
        self.quantity = merged;
        self.unit_amount = unit_amount;
        self.recorded_at = at;
        Ok(())
    }

    /// Replace every editable field, keeping the store-assigned `id`.
    pub fn replace(
        &mut self,
        key: ProductKey,
        quantity: u64,
        unit_amount: u64,
        recorded_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.total_amount = derive_total(quantity, unit_amount)?;
        self.key = key;
        self.quantity = quantity;
        self.unit_amount = unit_amount;
        self.recorded_at = recorded_at;
        Ok(())
    }

    /// Remove sold units from this record.
    ///
    /// The caller has already checked sufficiency across the whole identity
    /// key; this guard only protects the single record.
    pub fn deduct(&mut self, quantity: u64) -> DomainResult<()> {
        let remaining = self.quantity.checked_sub(quantity).ok_or_else(|| {
            DomainError::insufficient_stock(quantity, self.quantity)
        })?;
        self.total_amount = derive_total(remaining, self.unit_amount)?;
        self.quantity = remaining;
        Ok(())
    }
}

impl StockRecord for Product {
    fn key(&self) -> &ProductKey {
        &self.key
    }

    fn quantity(&self) -> u64 {
        self.quantity
    }

    fn unit_amount(&self) -> u64 {
        self.unit_amount
    }
}

/// Immutable record of a completed sale. Created only by the billing path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    id: BillId,
    key: ProductKey,
    quantity: u64,
    unit_amount: u64,
    total_amount: u64,
    recorded_at: DateTime<Utc>,
}

impl Bill {
    pub fn new(
        id: BillId,
        key: ProductKey,
        quantity: u64,
        unit_amount: u64,
        recorded_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let total_amount = derive_total(quantity, unit_amount)?;
        Ok(Self {
            id,
            key,
            quantity,
            unit_amount,
            total_amount,
            recorded_at,
        })
    }

    pub fn id(&self) -> BillId {
        self.id
    }

    pub fn key(&self) -> &ProductKey {
        &self.key
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn unit_amount(&self) -> u64 {
        self.unit_amount
    }

    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

impl StockRecord for Bill {
    fn key(&self) -> &ProductKey {
        &self.key
    }

    fn quantity(&self) -> u64 {
        self.quantity
    }

    fn unit_amount(&self) -> u64 {
        self.unit_amount
    }
}

/// Immutable audit mirror of a restock event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    id: PurchaseId,
    key: ProductKey,
    quantity: u64,
    unit_amount: u64,
    total_amount: u64,
    recorded_at: DateTime<Utc>,
}

impl Purchase {
    pub fn new(
        id: PurchaseId,
        key: ProductKey,
        quantity: u64,
        unit_amount: u64,
        recorded_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let total_amount = derive_total(quantity, unit_amount)?;
        Ok(Self {
            id,
            key,
            quantity,
            unit_amount,
            total_amount,
            recorded_at,
        })
    }

    pub fn id(&self) -> PurchaseId {
        self.id
    }

    pub fn key(&self) -> &ProductKey {
        &self.key
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn unit_amount(&self) -> u64 {
        self.unit_amount
    }

    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

impl StockRecord for Purchase {
    fn key(&self) -> &ProductKey {
        &self.key
    }

    fn quantity(&self) -> u64 {
        self.quantity
    }

    fn unit_amount(&self) -> u64 {
        self.unit_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> ProductKey {
        ProductKey::new("Silk-A", "MfgX").unwrap()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn total_is_derived_on_construction() {
        let product = Product::new(ProductId::new(), test_key(), 150, 10, test_time()).unwrap();
        assert_eq!(product.total_amount(), 1500);
    }

    #[test]
    fn construction_rejects_total_overflow() {
        let err = Product::new(ProductId::new(), test_key(), u64::MAX, 2, test_time()).unwrap_err();
        match err {
            DomainError::InvalidInput(msg) => assert!(msg.contains("overflow")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn restock_adds_quantity_and_refreshes_price() {
        let mut product = Product::new(ProductId::new(), test_key(), 150, 10, test_time()).unwrap();
        product.restock(20, 12, test_time()).unwrap();
        assert_eq!(product.quantity(), 170);
        assert_eq!(product.unit_amount(), 12);
        assert_eq!(product.total_amount(), 170 * 12);
    }

    #[test]
    fn deduct_keeps_total_consistent() {
        let mut product = Product::new(ProductId::new(), test_key(), 170, 10, test_time()).unwrap();
        product.deduct(100).unwrap();
        assert_eq!(product.quantity(), 70);
        assert_eq!(product.total_amount(), 700);
    }

    #[test]
    fn deduct_beyond_stock_fails_without_mutation() {
        let mut product = Product::new(ProductId::new(), test_key(), 70, 10, test_time()).unwrap();
        let err = product.deduct(100).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                requested: 100,
                available: 70
            }
        );
        assert_eq!(product.quantity(), 70);
        assert_eq!(product.total_amount(), 700);
    }

    #[test]
    fn replace_recomputes_total_and_keeps_id() {
        let id = ProductId::new();
        let mut product = Product::new(id, test_key(), 10, 5, test_time()).unwrap();
        let new_key = ProductKey::new("Silk-B", "MfgY").unwrap();
        product.replace(new_key.clone(), 3, 7, test_time()).unwrap();
        assert_eq!(product.id(), id);
        assert_eq!(product.key(), &new_key);
        assert_eq!(product.total_amount(), 21);
    }

    #[test]
    fn bill_total_is_derived_from_its_own_line() {
        let bill = Bill::new(BillId::new(), test_key(), 4, 25, test_time()).unwrap();
        assert_eq!(bill.total_amount(), 100);
        assert_eq!(bill.line_total(), 100u128);
    }
}
