//! The engine's request/response surface.
//!
//! All mutations against one identity key are serialized through the key-lock
//! registry; reporting reads run concurrently against store snapshots and may
//! trail an in-flight mutation by at most its duration.

use chrono::{DateTime, Utc};

use stockroom_core::{BillId, Clock, ProductId, ProductKey, PurchaseId};
use stockroom_ledger::{
    Bill, LowStockAlert, Product, Purchase, StockSummary, aggregate, low_stock,
};
use stockroom_store::{BillStore, ProductStore, PurchaseStore, StorageError};

use crate::config::{EngineConfig, RestockPolicy, SalePriceSource};
use crate::error::{EngineError, EngineResult};
use crate::keylock::{self, KeyLocks};
use crate::request::{BillRequest, ProductEdit, RestockRequest};

/// Result of a successful sale: the immutable bill plus the updated product
/// snapshot(s) it drew from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillReceipt {
    pub bill: Bill,
    pub products: Vec<Product>,
}

/// What a restock physically changed, kept around so a fault in the audit
/// append can unwind it.
enum RestockApplied {
    Inserted(ProductId),
    Merged {
        prior: Product,
        removed: Vec<Product>,
    },
}

/// The inventory ledger and billing consistency engine.
pub struct InventoryService<P, B, R, C> {
    products: P,
    bills: B,
    purchases: R,
    clock: C,
    config: EngineConfig,
    key_locks: KeyLocks,
}

impl<P, B, R, C> InventoryService<P, B, R, C>
where
    P: ProductStore,
    B: BillStore,
    R: PurchaseStore,
    C: Clock,
{
    pub fn new(products: P, bills: B, purchases: R, clock: C, config: EngineConfig) -> Self {
        Self {
            products,
            bills,
            purchases,
            clock,
            config,
            key_locks: KeyLocks::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// RestockAdd: create or merge a stock record and append the purchase
    /// audit mirror.
    pub fn add_stock(&self, request: &RestockRequest) -> EngineResult<Product> {
        let key = request.validate()?;
        let at = request.date.unwrap_or_else(|| self.clock.now());

        let handle = self.key_locks.handle(&key);
        let _guard = keylock::lock(&handle);

        let (product, applied) = match self.config.restock_policy {
            RestockPolicy::AlwaysInsert => self.insert_fresh(&key, request, at)?,
            RestockPolicy::MergeOnIdentity => {
                let fragments = self.products.find_by_key(&key)?;
                match fragments.split_first() {
                    None => self.insert_fresh(&key, request, at)?,
                    Some((oldest, siblings)) => {
                        self.merge_into_oldest(oldest, siblings, request, at)?
                    }
                }
            }
        };

        let purchase = Purchase::new(
            PurchaseId::new(),
            key.clone(),
            request.quantity,
            request.unit_amount,
            at,
        )?;
        if let Err(e) = self.purchases.append(purchase) {
            self.undo_restock(&applied);
            return Err(e.into());
        }

        tracing::info!(
            %key,
            quantity = request.quantity,
            unit_amount = request.unit_amount,
            policy = ?self.config.restock_policy,
            "stock added"
        );
        Ok(product)
    }

    /// ProductList: every stock record, most recent first.
    pub fn list_products(&self) -> EngineResult<Vec<Product>> {
        let mut rows = self.products.scan()?;
        rows.sort_by(|a, b| {
            b.recorded_at()
                .cmp(&a.recorded_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(rows)
    }

    /// ProductEdit: replace the full field set of the record with this id.
    /// Historical bills and purchases are untouched.
    pub fn edit_product(&self, id: ProductId, edit: &ProductEdit) -> EngineResult<Product> {
        let new_key = edit.validate()?;
        loop {
            let existing = self.products.get(id)?.ok_or(EngineError::NotFound)?;

            // Lock both the current and the target key in sorted order; an
            // edit may move the record between identity keys.
            let mut keys = vec![existing.key().clone(), new_key.clone()];
            let handles = self.key_locks.handles_ordered(&mut keys);
            let _guards: Vec<_> = handles.iter().map(|h| keylock::lock(h)).collect();

            let mut current = self.products.get(id)?.ok_or(EngineError::NotFound)?;
            if !keys.contains(current.key()) {
                // A concurrent edit moved the record to a key outside the
                // locked set between the read and the lock; retry under the
                // record's current key.
                continue;
            }

            let at = edit.date.unwrap_or_else(|| self.clock.now());
            current.replace(new_key.clone(), edit.quantity, edit.unit_amount, at)?;

            if !self.products.update(current.clone())? {
                return Err(EngineError::NotFound);
            }
            tracing::info!(product_id = %id, key = %current.key(), "product edited");
            return Ok(current);
        }
    }

    /// ProductDelete: remove exactly the record with this id. Fragments
    /// sharing its identity key survive, as do historical bills/purchases.
    pub fn delete_product(&self, id: ProductId) -> EngineResult<Product> {
        let product = self.products.get(id)?.ok_or(EngineError::NotFound)?;

        let handle = self.key_locks.handle(product.key());
        let _guard = keylock::lock(&handle);

        if !self.products.delete(id)? {
            return Err(EngineError::NotFound);
        }
        let siblings = self.products.find_by_key(product.key())?.len();
        tracing::info!(product_id = %id, key = %product.key(), siblings, "product deleted");
        Ok(product)
    }

    /// BillGenerate: the stock mutator. Read, check, decrement, and append
    /// run as one unit under the identity key's lock.
    pub fn generate_bill(&self, request: &BillRequest) -> EngineResult<BillReceipt> {
        request.validate()?;
        let key = self.resolve_bill_key(request)?;

        let handle = self.key_locks.handle(&key);
        let _guard = keylock::lock(&handle);

        let fragments = self.products.find_by_key(&key)?;
        if fragments.is_empty() {
            return Err(EngineError::NotFound);
        }

        let available = fragments
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.quantity()));
        if available < request.quantity {
            tracing::warn!(
                %key,
                requested = request.quantity,
                available,
                "sale rejected: insufficient stock"
            );
            return Err(EngineError::InsufficientStock {
                requested: request.quantity,
                available,
            });
        }

        let unit_amount = match self.config.sale_price_source {
            SalePriceSource::RequestPrice => request.unit_amount.ok_or_else(|| {
                EngineError::invalid_input(
                    "unit amount is required when sales are priced from the request",
                )
            })?,
            // Price of the first fragment the sale draws from.
            SalePriceSource::ProductPrice => fragments
                .iter()
                .find(|p| p.quantity() > 0)
                .map(Product::unit_amount)
                .unwrap_or_else(|| fragments[0].unit_amount()),
        };

        // Decrement plan: draw from fragments oldest-first.
        let mut remaining = request.quantity;
        let mut plan: Vec<(Product, Product)> = Vec::new();
        for fragment in &fragments {
            if remaining == 0 {
                break;
            }
            if fragment.quantity() == 0 {
                continue;
            }
            let take = fragment.quantity().min(remaining);
            let mut updated = fragment.clone();
            updated.deduct(take)?;
            remaining -= take;
            plan.push((fragment.clone(), updated));
        }
        debug_assert_eq!(remaining, 0);

        // The bill id exists before the write phase; after a commit fault the
        // caller probes the bill store with it to learn the outcome.
        let bill_id = BillId::new();
        let bill = Bill::new(
            bill_id,
            key.clone(),
            request.quantity,
            unit_amount,
            self.clock.now(),
        )?;

        let mut written: Vec<Product> = Vec::new();
        for (prior, updated) in &plan {
            if let Err(e) = self.write_product(updated) {
                return Err(self.roll_back(bill_id, &written, e));
            }
            written.push(prior.clone());
        }
        if let Err(e) = self.bills.append(bill.clone()) {
            return Err(self.roll_back(bill_id, &written, e));
        }

        tracing::info!(
            %key,
            %bill_id,
            quantity = request.quantity,
            unit_amount,
            "bill generated"
        );
        Ok(BillReceipt {
            bill,
            products: plan.into_iter().map(|(_, updated)| updated).collect(),
        })
    }

    /// BillList: every sale, most recent first.
    pub fn list_bills(&self) -> EngineResult<Vec<Bill>> {
        let mut rows = self.bills.scan()?;
        rows.sort_by(|a, b| {
            b.recorded_at()
                .cmp(&a.recorded_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(rows)
    }

    /// Every restock event, most recent first.
    pub fn list_purchases(&self) -> EngineResult<Vec<Purchase>> {
        let mut rows = self.purchases.scan()?;
        rows.sort_by(|a, b| {
            b.recorded_at()
                .cmp(&a.recorded_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(rows)
    }

    /// LowStockReport: identity keys whose aggregated quantity is strictly
    /// below the configured threshold, sold-out keys included.
    pub fn low_stock_report(&self) -> EngineResult<Vec<LowStockAlert>> {
        let scan = self.products.scan()?;
        Ok(low_stock(&scan, self.config.low_stock_threshold))
    }

    /// Aggregated per-key view over the full product scan (dashboard).
    pub fn stock_summary(&self) -> EngineResult<StockSummary> {
        let scan = self.products.scan()?;
        Ok(aggregate(&scan))
    }

    fn insert_fresh(
        &self,
        key: &ProductKey,
        request: &RestockRequest,
        at: DateTime<Utc>,
    ) -> EngineResult<(Product, RestockApplied)> {
        let product = Product::new(
            ProductId::new(),
            key.clone(),
            request.quantity,
            request.unit_amount,
            at,
        )?;
        self.products.insert(product.clone())?;
        let id = product.id();
        Ok((product, RestockApplied::Inserted(id)))
    }

    fn merge_into_oldest(
        &self,
        oldest: &Product,
        siblings: &[Product],
        request: &RestockRequest,
        at: DateTime<Utc>,
    ) -> EngineResult<(Product, RestockApplied)> {
        // Stray fragments (rows written before this policy was in effect)
        // fold into the oldest record so point lookups stay correct.
        let mut quantity = request.quantity;
        for sibling in siblings {
            quantity = quantity.checked_add(sibling.quantity()).ok_or_else(|| {
                EngineError::invalid_input("merged quantity overflows")
            })?;
        }

        let mut merged = oldest.clone();
        merged.restock(quantity, request.unit_amount, at)?;
        self.write_product(&merged)?;

        let mut removed: Vec<Product> = Vec::new();
        for sibling in siblings {
            if let Err(e) = self.products.delete(sibling.id()) {
                self.undo_restock(&RestockApplied::Merged {
                    prior: oldest.clone(),
                    removed,
                });
                return Err(e.into());
            }
            removed.push(sibling.clone());
        }

        Ok((
            merged,
            RestockApplied::Merged {
                prior: oldest.clone(),
                removed,
            },
        ))
    }

    fn resolve_bill_key(&self, request: &BillRequest) -> EngineResult<ProductKey> {
        match &request.manufacturer {
            Some(manufacturer) => Ok(ProductKey::new(&request.product_name, manufacturer)?),
            None => {
                let name = request.product_name.trim();
                let scan = self.products.scan()?;
                let mut keys: Vec<ProductKey> = scan
                    .iter()
                    .filter(|p| p.key().product_name() == name)
                    .map(|p| p.key().clone())
                    .collect();
                keys.sort();
                keys.dedup();
                match keys.as_slice() {
                    [] => Err(EngineError::NotFound),
                    [only] => Ok(only.clone()),
                    _ => Err(EngineError::invalid_input(format!(
                        "product name '{name}' matches multiple manufacturers; specify one"
                    ))),
                }
            }
        }
    }

    fn write_product(&self, product: &Product) -> Result<(), StorageError> {
        if self.products.update(product.clone())? {
            Ok(())
        } else {
            Err(StorageError::backend("product row vanished during update"))
        }
    }

    /// Restore pre-call fragment snapshots after a commit-phase fault. If the
    /// restore itself fails, stock state is indeterminate and the error
    /// carries the bill id for reconciliation.
    fn roll_back(&self, bill_id: BillId, priors: &[Product], cause: StorageError) -> EngineError {
        for prior in priors {
            let restored = matches!(self.products.update(prior.clone()), Ok(true));
            if !restored {
                tracing::error!(
                    %bill_id,
                    product_id = %prior.id(),
                    "rollback failed; stock state indeterminate"
                );
                return EngineError::CommitFault {
                    bill_id,
                    source: cause,
                };
            }
        }
        EngineError::Storage(cause)
    }

    fn undo_restock(&self, applied: &RestockApplied) {
        let outcome = match applied {
            RestockApplied::Inserted(id) => self.products.delete(*id).map(|_| ()),
            RestockApplied::Merged { prior, removed } => {
                self.products.update(prior.clone()).and_then(|_| {
                    for row in removed {
                        self.products.insert(row.clone())?;
                    }
                    Ok(())
                })
            }
        };
        if let Err(e) = outcome {
            tracing::error!(error = %e, "restock rollback failed; product table state indeterminate");
        }
    }
}
