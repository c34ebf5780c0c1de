use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{ColorVariation, MovementKind, Product, SizeVariation, StockTransaction};

use super::EngineError;

/// Intent to move stock against one color/size of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRequest {
    pub product_id: String,
    pub variation_id: String,
    pub size_id: String,
    /// Magnitude of the movement, must be > 0.
    pub quantity: i64,
    pub kind: MovementKind,
}

/// Outcome of [`apply_movement`]: the rewritten product record and the
/// ledger entry appended with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub product: Product,
    pub transaction: StockTransaction,
}

/// Outcome of [`edit_transaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub product: Product,
    pub transaction: StockTransaction,
}

/// Outcome of [`delete_transaction`].
///
/// `product` is `None` when the referenced product/variation/size no
/// longer resolves: the stock-side reversal is skipped, and the caller
/// decides whether to still remove the ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    pub product: Option<Product>,
}

/// Outcome of [`clear_account`]: everything to remove, in one batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Clearance {
    pub product_ids: Vec<String>,
    pub transaction_ids: Vec<String>,
}

fn resolve<'a>(
    products: &'a [Product],
    product_id: &str,
    variation_id: &str,
    size_id: &str,
) -> Option<(&'a Product, &'a ColorVariation, &'a SizeVariation)> {
    let product = products.iter().find(|p| p.id == product_id)?;
    let variation = product.variation(variation_id)?;
    let size = variation.sizes.iter().find(|s| s.id == size_id)?;
    Some((product, variation, size))
}

fn with_quantity(product: &Product, variation_id: &str, size_id: &str, quantity: i64) -> Product {
    let mut updated = product.clone();
    for variation in &mut updated.variations {
        if variation.id != variation_id {
            continue;
        }
        for size in &mut variation.sizes {
            if size.id == size_id {
                size.quantity = quantity;
            }
        }
    }
    updated
}

/// Apply a stock movement: adjust the size quantity and append the ledger
/// entry recording it.
///
/// Stock-out below zero is floored at zero rather than rejected; the
/// appended entry still records the *requested* magnitude, not the clamped
/// delta, so the ledger reflects intent.
pub fn apply_movement(
    products: &[Product],
    request: &MovementRequest,
) -> Result<Movement, EngineError> {
    if request.quantity <= 0 {
        return Err(EngineError::ZeroQuantity);
    }

    let (product, variation, size) = resolve(
        products,
        &request.product_id,
        &request.variation_id,
        &request.size_id,
    )
    .ok_or_else(|| EngineError::UnresolvedReference {
        product_id: request.product_id.clone(),
        variation_id: request.variation_id.clone(),
        size_id: request.size_id.clone(),
    })?;

    let moved = size.quantity + request.kind.signed_effect(request.quantity);
    let updated = with_quantity(product, &request.variation_id, &request.size_id, moved.max(0));

    let transaction = StockTransaction {
        id: Uuid::new_v4().to_string(),
        product_id: product.id.clone(),
        variation_id: request.variation_id.clone(),
        size_id: request.size_id.clone(),
        product_name: product.name.clone(),
        color: variation.color.clone(),
        size: size.size.clone(),
        quantity: request.quantity,
        kind: request.kind,
        date: Utc::now(),
    };

    Ok(Movement {
        product: updated,
        transaction,
    })
}

/// Replace the magnitude of a past ledger entry and shift the stock by the
/// difference of signed effects, under the entry's unchanged kind.
///
/// The entry's `kind` and `id` are immutable; `date` is reset to now. An
/// edit that would drive the stock negative is rejected, so the available
/// bound holds regardless of caller discipline.
pub fn edit_transaction(
    products: &[Product],
    original: &StockTransaction,
    new_quantity: i64,
) -> Result<Edit, EngineError> {
    if new_quantity <= 0 {
        return Err(EngineError::ZeroQuantity);
    }

    let (product, _, size) = resolve(
        products,
        &original.product_id,
        &original.variation_id,
        &original.size_id,
    )
    .ok_or_else(|| EngineError::UnresolvedReference {
        product_id: original.product_id.clone(),
        variation_id: original.variation_id.clone(),
        size_id: original.size_id.clone(),
    })?;

    let stock_delta = original.kind.signed_effect(new_quantity) - original.signed_effect();
    let new_stock = size.quantity + stock_delta;
    if new_stock < 0 {
        return Err(EngineError::InsufficientStock {
            available: size.quantity,
            requested: -stock_delta,
        });
    }

    let updated = with_quantity(product, &original.variation_id, &original.size_id, new_stock);

    let mut transaction = original.clone();
    transaction.quantity = new_quantity;
    transaction.date = Utc::now();

    Ok(Edit {
        product: updated,
        transaction,
    })
}

/// Reverse a ledger entry's signed effect ahead of removing it.
///
/// No floor is applied: if ledger and catalog have already diverged the
/// reversal may undershoot zero, which is accepted over losing it. When
/// the reference no longer resolves the stock side is skipped and
/// `Deletion::product` is `None`.
pub fn delete_transaction(products: &[Product], transaction: &StockTransaction) -> Deletion {
    let resolved = resolve(
        products,
        &transaction.product_id,
        &transaction.variation_id,
        &transaction.size_id,
    );

    let product = resolved.map(|(product, _, size)| {
        with_quantity(
            product,
            &transaction.variation_id,
            &transaction.size_id,
            size.quantity - transaction.signed_effect(),
        )
    });

    Deletion { product }
}

/// Enumerate every product and ledger entry for removal in one batch.
pub fn clear_account(products: &[Product], transactions: &[StockTransaction]) -> Clearance {
    Clearance {
        product_ids: products.iter().map(|p| p.id.clone()).collect(),
        transaction_ids: transactions.iter().map(|t| t.id.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ColorVariation, SizeVariation};

    fn shoe(quantity: i64) -> Product {
        Product::new(
            "Air Max",
            vec![ColorVariation::new(
                "Black",
                vec![SizeVariation::new("10", quantity)],
            )],
        )
    }

    fn request(product: &Product, quantity: i64, kind: MovementKind) -> MovementRequest {
        MovementRequest {
            product_id: product.id.clone(),
            variation_id: product.variations[0].id.clone(),
            size_id: product.variations[0].sizes[0].id.clone(),
            quantity,
            kind,
        }
    }

    fn quantity_of(product: &Product) -> i64 {
        product.variations[0].sizes[0].quantity
    }

    #[test]
    fn stock_in_adds_and_appends_entry() {
        let product = shoe(5);
        let movement =
            apply_movement(&[product.clone()], &request(&product, 3, MovementKind::StockIn))
                .unwrap();

        assert_eq!(quantity_of(&movement.product), 8);
        assert_eq!(movement.transaction.quantity, 3);
        assert_eq!(movement.transaction.kind, MovementKind::StockIn);
        assert_eq!(movement.transaction.product_name, "Air Max");
        assert_eq!(movement.transaction.color, "Black");
        assert_eq!(movement.transaction.size, "10");
    }

    #[test]
    fn stock_out_subtracts() {
        let product = shoe(5);
        let movement =
            apply_movement(&[product.clone()], &request(&product, 2, MovementKind::StockOut))
                .unwrap();
        assert_eq!(quantity_of(&movement.product), 3);
    }

    #[test]
    fn stock_out_clamps_at_zero_but_records_requested_magnitude() {
        let product = shoe(0);
        let movement =
            apply_movement(&[product.clone()], &request(&product, 5, MovementKind::StockOut))
                .unwrap();

        assert_eq!(quantity_of(&movement.product), 0);
        assert_eq!(movement.transaction.quantity, 5);
    }

    #[test]
    fn movement_rejects_non_positive_quantity() {
        let product = shoe(5);
        for bad in [0, -1] {
            let result =
                apply_movement(&[product.clone()], &request(&product, bad, MovementKind::StockIn));
            assert_eq!(result, Err(EngineError::ZeroQuantity));
        }
    }

    #[test]
    fn movement_rejects_unresolved_size() {
        let product = shoe(5);
        let mut req = request(&product, 1, MovementKind::StockIn);
        req.size_id = "missing".to_string();
        assert!(matches!(
            apply_movement(&[product], &req),
            Err(EngineError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn movement_leaves_other_sizes_untouched() {
        let mut product = shoe(5);
        product.variations[0].sizes.push(SizeVariation::new("11", 7));
        let movement =
            apply_movement(&[product.clone()], &request(&product, 3, MovementKind::StockIn))
                .unwrap();

        assert_eq!(movement.product.variations[0].sizes[1].quantity, 7);
    }

    #[test]
    fn edit_shifts_stock_by_signed_difference() {
        // qty 5, stock-in 3 -> 8, edit entry to 10 -> 8 + (10-3) = 15.
        let product = shoe(5);
        let movement =
            apply_movement(&[product.clone()], &request(&product, 3, MovementKind::StockIn))
                .unwrap();

        let edit = edit_transaction(
            &[movement.product.clone()],
            &movement.transaction,
            10,
        )
        .unwrap();

        assert_eq!(quantity_of(&edit.product), 15);
        assert_eq!(edit.transaction.quantity, 10);
        assert_eq!(edit.transaction.id, movement.transaction.id);
        assert_eq!(edit.transaction.kind, MovementKind::StockIn);
        assert!(edit.transaction.date >= movement.transaction.date);
    }

    #[test]
    fn edit_with_same_quantity_leaves_stock_unchanged() {
        let product = shoe(5);
        let movement =
            apply_movement(&[product.clone()], &request(&product, 3, MovementKind::StockOut))
                .unwrap();

        let edit = edit_transaction(&[movement.product.clone()], &movement.transaction, 3).unwrap();
        assert_eq!(quantity_of(&edit.product), quantity_of(&movement.product));
    }

    #[test]
    fn edit_rejects_stock_out_increase_beyond_available() {
        let product = shoe(5);
        let movement =
            apply_movement(&[product.clone()], &request(&product, 3, MovementKind::StockOut))
                .unwrap();
        assert_eq!(quantity_of(&movement.product), 2);

        // Raising the stock-out from 3 to 6 needs 3 more units; only 2 remain.
        let result = edit_transaction(&[movement.product.clone()], &movement.transaction, 6);
        assert_eq!(
            result,
            Err(EngineError::InsufficientStock {
                available: 2,
                requested: 3,
            })
        );
    }

    #[test]
    fn edit_rejects_non_positive_quantity() {
        let product = shoe(5);
        let movement =
            apply_movement(&[product.clone()], &request(&product, 3, MovementKind::StockIn))
                .unwrap();
        assert_eq!(
            edit_transaction(&[movement.product], &movement.transaction, 0),
            Err(EngineError::ZeroQuantity)
        );
    }

    #[test]
    fn edit_reports_unresolved_reference() {
        let product = shoe(5);
        let movement =
            apply_movement(&[product.clone()], &request(&product, 3, MovementKind::StockIn))
                .unwrap();

        // Product deleted after the movement: the edit aborts, reported.
        assert!(matches!(
            edit_transaction(&[], &movement.transaction, 5),
            Err(EngineError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn delete_reverses_current_magnitude() {
        // After the edit to 10, deletion reverses by the entry's *current*
        // magnitude: 15 - 10 = 5.
        let product = shoe(5);
        let movement =
            apply_movement(&[product.clone()], &request(&product, 3, MovementKind::StockIn))
                .unwrap();
        let edit =
            edit_transaction(&[movement.product.clone()], &movement.transaction, 10).unwrap();

        let deletion = delete_transaction(&[edit.product.clone()], &edit.transaction);
        assert_eq!(quantity_of(&deletion.product.unwrap()), 5);
    }

    #[test]
    fn delete_restores_pre_movement_quantity() {
        for kind in [MovementKind::StockIn, MovementKind::StockOut] {
            let product = shoe(5);
            let movement =
                apply_movement(&[product.clone()], &request(&product, 4, kind)).unwrap();
            let deletion = delete_transaction(&[movement.product.clone()], &movement.transaction);
            assert_eq!(quantity_of(&deletion.product.unwrap()), 5);
        }
    }

    #[test]
    fn delete_without_floor_can_undershoot_on_diverged_state() {
        // Catalog says 2, ledger says a 7-unit stock-in happened: reversing
        // drives the quantity to -5 rather than losing the reversal.
        let product = shoe(5);
        let movement =
            apply_movement(&[product.clone()], &request(&product, 7, MovementKind::StockIn))
                .unwrap();
        let diverged = with_quantity(
            &movement.product,
            &movement.transaction.variation_id,
            &movement.transaction.size_id,
            2,
        );

        let deletion = delete_transaction(&[diverged], &movement.transaction);
        assert_eq!(quantity_of(&deletion.product.unwrap()), -5);
    }

    #[test]
    fn delete_skips_stock_side_when_unresolved() {
        let product = shoe(5);
        let movement =
            apply_movement(&[product.clone()], &request(&product, 3, MovementKind::StockIn))
                .unwrap();

        let deletion = delete_transaction(&[], &movement.transaction);
        assert_eq!(deletion.product, None);
    }

    #[test]
    fn clear_account_enumerates_everything() {
        let a = shoe(1);
        let b = shoe(2);
        let movement = apply_movement(&[a.clone()], &request(&a, 1, MovementKind::StockIn)).unwrap();

        let clearance = clear_account(&[a.clone(), b.clone()], &[movement.transaction.clone()]);
        assert_eq!(clearance.product_ids, vec![a.id, b.id]);
        assert_eq!(clearance.transaction_ids, vec![movement.transaction.id]);

        assert_eq!(clear_account(&[], &[]), Clearance::default());
    }
}
