//! Summary - Derived totals over the current product collection.
//!
//! Pure and recomputed on every observation; nothing here is cached or
//! incrementally maintained.

use serde::{Deserialize, Serialize};

use crate::catalog::{Product, StockTransaction};

/// Aggregate totals for one account's catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    /// Sum of every size quantity across all products and variations.
    pub total_stock: i64,
    /// Number of products.
    pub total_products: usize,
}

/// Fold the product collection into its totals.
pub fn summarize(products: &[Product]) -> InventorySummary {
    let total_stock = products
        .iter()
        .flat_map(|product| &product.variations)
        .flat_map(|variation| &variation.sizes)
        .map(|size| size.quantity)
        .sum();

    InventorySummary {
        total_stock,
        total_products: products.len(),
    }
}

/// Ledger entries ordered newest-first for display.
pub fn recent_first(transactions: &[StockTransaction]) -> Vec<StockTransaction> {
    let mut ordered = transactions.to_vec();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    ordered
}
