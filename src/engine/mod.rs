//! Engine - Ledger-consistent stock mutation.
//!
//! The four mutation operations are pure functions over an immutable
//! snapshot of the product collection. Each returns a complete outcome
//! (updated product record plus the ledger entry it pairs with) that the
//! orchestration layer compiles into exactly one atomic multi-write, so a
//! reader never observes a ledger entry without its stock effect or vice
//! versa. Computing the whole outcome in one step also eliminates
//! read-modify-write races within a single call.
//!
//! Resolution back to the catalog is by stable ids; the labels on a
//! [`StockTransaction`](crate::StockTransaction) are display snapshots only.

mod mutation;

use std::fmt;

/// Error rejecting a mutation before any write is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Movement and edit magnitudes must be positive.
    ZeroQuantity,
    /// The referenced product, variation, or size no longer exists.
    UnresolvedReference {
        product_id: String,
        variation_id: String,
        size_id: String,
    },
    /// The edit would remove more stock than is available.
    InsufficientStock { available: i64, requested: i64 },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ZeroQuantity => write!(f, "movement quantity must be positive"),
            EngineError::UnresolvedReference {
                product_id,
                variation_id,
                size_id,
            } => write!(
                f,
                "unresolved reference: product {} variation {} size {}",
                product_id, variation_id, size_id
            ),
            EngineError::InsufficientStock { available, requested } => write!(
                f,
                "insufficient stock: {} available, {} requested",
                available, requested
            ),
        }
    }
}

impl std::error::Error for EngineError {}

pub use mutation::{
    apply_movement, clear_account, delete_transaction, edit_transaction, Clearance, Deletion,
    Edit, Movement, MovementRequest,
};
