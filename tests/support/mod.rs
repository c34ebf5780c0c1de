//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use std::sync::Arc;

use stockledger::{
    AccountId, ColorVariation, InMemoryStore, InventoryService, MovementKind, MovementRequest,
    Product, SizeVariation,
};

pub fn service() -> InventoryService<InMemoryStore> {
    service_on(Arc::new(InMemoryStore::new()), "acct-1")
}

pub fn service_on(store: Arc<InMemoryStore>, account: &str) -> InventoryService<InMemoryStore> {
    InventoryService::new(store, AccountId::from(account))
}

/// "Air Max" / Black / size 10 with the given starting quantity, saved.
pub fn saved_shoe(service: &InventoryService<InMemoryStore>, quantity: i64) -> Product {
    service
        .save_product(Product::new(
            "Air Max",
            vec![ColorVariation::new(
                "Black",
                vec![SizeVariation::new("10", quantity)],
            )],
        ))
        .expect("fixture product is valid")
}

pub fn movement(product: &Product, quantity: i64, kind: MovementKind) -> MovementRequest {
    MovementRequest {
        product_id: product.id.clone(),
        variation_id: product.variations[0].id.clone(),
        size_id: product.variations[0].sizes[0].id.clone(),
        quantity,
        kind,
    }
}

pub fn quantity_of(product: &Product) -> i64 {
    product.variations[0].sizes[0].quantity
}
