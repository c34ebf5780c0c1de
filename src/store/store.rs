use serde::{Deserialize, Serialize};

use crate::catalog::{Model, Product, StockTransaction};
use crate::identity::AccountId;

use super::{StoreError, WriteSet};

/// A whole-account view of the store: every product and every ledger
/// entry, pushed to subscribers after each successful mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub products: Vec<Product>,
    pub transactions: Vec<StockTransaction>,
}

/// Hierarchical key-value storage scoped per account.
pub trait AccountStore: Send + Sync {
    /// Load every record of one collection for an account.
    fn load_all<M: Model>(&self, account: &AccountId) -> Result<Vec<M>, StoreError>;

    /// Write a single record.
    fn write_model<M: Model>(&self, account: &AccountId, model: &M) -> Result<(), StoreError>;

    /// Delete a single record. Returns true if it existed.
    fn delete_model<M: Model>(&self, account: &AccountId, id: &str) -> Result<bool, StoreError>;

    /// Apply a write set as one atomic batch: all ops or none.
    fn commit(&self, writes: WriteSet) -> Result<(), StoreError>;

    /// Assemble the current whole-account snapshot.
    fn snapshot(&self, account: &AccountId) -> Result<AccountSnapshot, StoreError>;

    /// Register a listener pushed a fresh [`AccountSnapshot`] after every
    /// successful mutation of the account.
    fn subscribe<F>(&self, account: &AccountId, listener: F) -> Result<(), StoreError>
    where
        F: Fn(AccountSnapshot) + Send + Sync + 'static;
}
