//! Store - Hierarchical per-account persistence seam.
//!
//! Values live under `accounts/{account}/{collection}/{id}` where the
//! collection name comes from [`Model::COLLECTION`](crate::Model). Every
//! mutation the engine produces is compiled into one [`WriteSet`] and
//! applied by [`AccountStore::commit`] as a single atomic batch: all ops
//! or none, no partially visible state.
//!
//! Reads are push-based. [`AccountStore::subscribe`] delivers a whole
//! [`AccountSnapshot`] after every successful mutation; consumers
//! re-derive everything from each snapshot, there is no diffing contract.
//!
//! ## Example
//!
//! ```ignore
//! use stockledger::{AccountStore, InMemoryStore, WriteSet};
//!
//! let store = InMemoryStore::new();
//! let writes = WriteSet::for_account(&account)
//!     .put(&updated_product)
//!     .put(&new_transaction);
//! store.commit(writes)?;
//! ```

mod in_memory;
mod store;
mod write_set;

use std::fmt;

/// Error type for store operations.
///
/// The core performs no retry on failure; callers keep whatever the last
/// successful snapshot was, since state is never mutated locally outside
/// of snapshots pushed back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A storage lock was poisoned.
    LockPoisoned(&'static str),
    /// Serialization/deserialization of a stored value failed.
    Serde(String),
    /// Backend-level failure (network, auth, disk).
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Serde(msg) => write!(f, "store serialization error: {}", msg),
            StoreError::Backend(msg) => write!(f, "store backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub use in_memory::InMemoryStore;
pub use store::{AccountSnapshot, AccountStore};
pub use write_set::{WriteOp, WriteSet};
