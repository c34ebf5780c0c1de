//! Catalog - Products with color/size variations, and the stock ledger records.
//!
//! Pure data plus the product save boundary. Anything that mutates
//! quantities lives in the engine; this module only defines shape,
//! storage typing (the [`Model`] trait), and the validation gate applied
//! when a product is created or edited.

mod product;
mod transaction;

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// Trait for types that can be stored as models.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this model type (e.g., "products").
    /// Maps to a path segment under the account in the store.
    const COLLECTION: &'static str;

    /// Returns the unique identifier for this model instance.
    fn id(&self) -> &str;
}

/// Error rejecting a product at the create/edit boundary.
///
/// Rejection happens before any write is attempted; there is no partial
/// save. Empty variation and size labels are discarded silently (matching
/// the form behavior the boundary fronts), so these errors only fire when
/// nothing valid survives or surviving labels collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Product name is empty or whitespace.
    EmptyName,
    /// No color variation with at least one size survived filtering.
    NoVariations,
    /// Two color variations on the same product share a label.
    DuplicateColor(String),
    /// Two sizes within one color variation share a label.
    DuplicateSize { color: String, size: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "product name cannot be empty"),
            ValidationError::NoVariations => {
                write!(f, "product needs at least one variation with at least one size")
            }
            ValidationError::DuplicateColor(color) => {
                write!(f, "duplicate color variation: {}", color)
            }
            ValidationError::DuplicateSize { color, size } => {
                write!(f, "duplicate size {} in color variation {}", size, color)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

pub use product::{ColorVariation, Product, SizeVariation};
pub use transaction::{MovementKind, StockTransaction};
