//! Service - Per-account orchestration over the engine and store.
//!
//! An [`InventoryService`] captures user intent, runs the engine against
//! the store's current snapshot, and compiles each outcome into exactly
//! one atomic write set. It never mutates state locally: consumers see
//! results through the snapshots the store pushes back.

use std::fmt;
use std::sync::Arc;

use log::warn;

use crate::catalog::{Product, StockTransaction, ValidationError};
use crate::engine::{self, EngineError, MovementRequest};
use crate::identity::AccountId;
use crate::store::{AccountSnapshot, AccountStore, StoreError, WriteSet};
use crate::summary::{summarize, InventorySummary};

/// Error type for service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Product rejected at the save boundary.
    Validation(ValidationError),
    /// Mutation rejected by the engine before any write.
    Engine(EngineError),
    /// Store failure; nothing was applied.
    Store(StoreError),
    /// No ledger entry with this id.
    UnknownTransaction(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Validation(e) => write!(f, "validation failed: {}", e),
            ServiceError::Engine(e) => write!(f, "mutation rejected: {}", e),
            ServiceError::Store(e) => write!(f, "store error: {}", e),
            ServiceError::UnknownTransaction(id) => write!(f, "unknown transaction: {}", id),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Validation(e) => Some(e),
            ServiceError::Engine(e) => Some(e),
            ServiceError::Store(e) => Some(e),
            ServiceError::UnknownTransaction(_) => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Validation(err)
    }
}

impl From<EngineError> for ServiceError {
    fn from(err: EngineError) -> Self {
        ServiceError::Engine(err)
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Store(err)
    }
}

/// Inventory operations for one authenticated account.
pub struct InventoryService<S: AccountStore> {
    store: Arc<S>,
    account: AccountId,
}

impl<S: AccountStore> InventoryService<S> {
    pub fn new(store: Arc<S>, account: AccountId) -> Self {
        InventoryService { store, account }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// Create or replace a product, gated by the save boundary.
    /// Product saves never touch the ledger.
    pub fn save_product(&self, product: Product) -> Result<Product, ServiceError> {
        let product = product.sanitized()?;
        self.store.write_model(&self.account, &product)?;
        Ok(product)
    }

    /// Remove a product from the catalog. Its ledger history is retained;
    /// the denormalized snapshots on the entries stay legible.
    pub fn delete_product(&self, product_id: &str) -> Result<bool, ServiceError> {
        Ok(self.store.delete_model::<Product>(&self.account, product_id)?)
    }

    /// Apply a stock movement: one atomic write of the updated product
    /// and the new ledger entry.
    pub fn record_movement(
        &self,
        request: &MovementRequest,
    ) -> Result<StockTransaction, ServiceError> {
        let products = self.store.load_all::<Product>(&self.account)?;
        let movement = engine::apply_movement(&products, request)?;

        let writes = WriteSet::for_account(&self.account)
            .put(&movement.product)
            .put(&movement.transaction);
        self.store.commit(writes)?;
        Ok(movement.transaction)
    }

    /// Replace a past entry's magnitude: one atomic write of the shifted
    /// product and the updated entry.
    pub fn edit_transaction(
        &self,
        transaction_id: &str,
        new_quantity: i64,
    ) -> Result<StockTransaction, ServiceError> {
        let original = self.find_transaction(transaction_id)?;
        let products = self.store.load_all::<Product>(&self.account)?;
        let edit = engine::edit_transaction(&products, &original, new_quantity)?;

        let writes = WriteSet::for_account(&self.account)
            .put(&edit.product)
            .put(&edit.transaction);
        self.store.commit(writes)?;
        Ok(edit.transaction)
    }

    /// Reverse an entry's stock effect and remove it, atomically.
    ///
    /// When the referenced product/variation/size no longer resolves the
    /// reversal is skipped and the entry is still removed (history is the
    /// only surviving record at that point).
    pub fn delete_transaction(&self, transaction_id: &str) -> Result<(), ServiceError> {
        let transaction = self.find_transaction(transaction_id)?;
        let products = self.store.load_all::<Product>(&self.account)?;
        let deletion = engine::delete_transaction(&products, &transaction);

        let mut writes = WriteSet::for_account(&self.account);
        match deletion.product {
            Some(product) => writes = writes.put(&product),
            None => warn!(
                "transaction {} no longer resolves; removing without stock reversal",
                transaction.id
            ),
        }
        writes = writes.tombstone::<StockTransaction>(&transaction.id);
        self.store.commit(writes)?;
        Ok(())
    }

    /// Remove every product and ledger entry for this account in one
    /// atomic write. Irreversible; confirmation is the caller's concern.
    pub fn clear_all(&self) -> Result<(), ServiceError> {
        let snapshot = self.store.snapshot(&self.account)?;
        let clearance = engine::clear_account(&snapshot.products, &snapshot.transactions);

        let mut writes = WriteSet::for_account(&self.account);
        for id in &clearance.product_ids {
            writes = writes.tombstone::<Product>(id);
        }
        for id in &clearance.transaction_ids {
            writes = writes.tombstone::<StockTransaction>(id);
        }
        self.store.commit(writes)?;
        Ok(())
    }

    /// Current whole-account snapshot, for hosts without a subscription.
    pub fn snapshot(&self) -> Result<AccountSnapshot, ServiceError> {
        Ok(self.store.snapshot(&self.account)?)
    }

    /// Current aggregate totals, recomputed from the product collection.
    pub fn summary(&self) -> Result<InventorySummary, ServiceError> {
        let products = self.store.load_all::<Product>(&self.account)?;
        Ok(summarize(&products))
    }

    /// Subscribe to snapshot pushes for this account.
    pub fn subscribe<F>(&self, listener: F) -> Result<(), ServiceError>
    where
        F: Fn(AccountSnapshot) + Send + Sync + 'static,
    {
        Ok(self.store.subscribe(&self.account, listener)?)
    }

    fn find_transaction(&self, transaction_id: &str) -> Result<StockTransaction, ServiceError> {
        let transactions = self.store.load_all::<StockTransaction>(&self.account)?;
        transactions
            .into_iter()
            .find(|t| t.id == transaction_id)
            .ok_or_else(|| ServiceError::UnknownTransaction(transaction_id.to_string()))
    }
}
