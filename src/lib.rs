mod catalog;
mod engine;
mod identity;
mod service;
mod store;
mod summary;

pub use catalog::{
    ColorVariation, Model, MovementKind, Product, SizeVariation, StockTransaction,
    ValidationError,
};
pub use engine::{
    Clearance, Deletion, Edit, EngineError, Movement, MovementRequest, apply_movement,
    clear_account, delete_transaction, edit_transaction,
};
pub use identity::{AccountId, AuthError, IdentityProvider, InMemoryIdentity, Session};
pub use service::{InventoryService, ServiceError};
pub use store::{
    AccountSnapshot, AccountStore, InMemoryStore, StoreError, WriteOp, WriteSet,
};
pub use summary::{InventorySummary, recent_first, summarize};

// Re-export the EventEmitter from the event_emitter_rs crate
pub use event_emitter_rs::EventEmitter;
