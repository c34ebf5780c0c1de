use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Model;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    StockIn,
    StockOut,
}

impl MovementKind {
    /// The directional delta a movement of `magnitude` implies:
    /// positive for stock-in, negative for stock-out.
    pub fn signed_effect(self, magnitude: i64) -> i64 {
        match self {
            MovementKind::StockIn => magnitude,
            MovementKind::StockOut => -magnitude,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementKind::StockIn => write!(f, "Stock In"),
            MovementKind::StockOut => write!(f, "Stock Out"),
        }
    }
}

/// One ledger entry: a single stock-in or stock-out of a given magnitude
/// against one specific color/size of one product.
///
/// Resolution back to the catalog is by the stable `product_id` /
/// `variation_id` / `size_id`. The `product_name`, `color`, and `size`
/// fields are display snapshots taken at movement time; they are not kept
/// in sync with later renames, so history stays legible even after the
/// catalog changes or the product is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTransaction {
    /// Assigned at creation, immutable thereafter.
    pub id: String,
    pub product_id: String,
    pub variation_id: String,
    pub size_id: String,
    pub product_name: String,
    pub color: String,
    pub size: String,
    /// Magnitude of the movement, always > 0. Direction lives in `kind`.
    pub quantity: i64,
    /// Immutable under edit.
    pub kind: MovementKind,
    /// Set at creation; reset to the current time when the entry is edited.
    pub date: DateTime<Utc>,
}

impl Model for StockTransaction {
    const COLLECTION: &'static str = "transactions";

    fn id(&self) -> &str {
        &self.id
    }
}

impl StockTransaction {
    /// The directional delta this entry currently implies on its size.
    pub fn signed_effect(&self) -> i64 {
        self.kind.signed_effect(self.quantity)
    }
}
