use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use event_emitter_rs::EventEmitter;
use log::debug;

use crate::catalog::{Model, Product, StockTransaction};
use crate::identity::AccountId;

use super::store::{AccountSnapshot, AccountStore};
use super::write_set::{collection_prefix, model_path, WriteOp, WriteSet};
use super::StoreError;

/// In-memory account store backed by a path-keyed map.
///
/// Values are JSON-serialized whole records. Snapshot pushes go through an
/// [`EventEmitter`] keyed by account path, with JSON string payloads.
/// Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemoryStore {
    storage: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    emitter: Arc<Mutex<EventEmitter>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        InMemoryStore {
            storage: Arc::new(RwLock::new(BTreeMap::new())),
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    fn account_event(account: &AccountId) -> String {
        format!("accounts/{}", account)
    }

    /// Push the account's current snapshot to its subscribers.
    fn notify(&self, account: &AccountId) -> Result<(), StoreError> {
        let snapshot = self.snapshot(account)?;
        let payload = serde_json::to_string(&snapshot)
            .map_err(|e| StoreError::Serde(e.to_string()))?;
        let handles = {
            let mut emitter = self
                .emitter
                .lock()
                .map_err(|_| StoreError::LockPoisoned("emitter"))?;
            emitter.emit(&Self::account_event(account), payload)
        };
        // Listeners run on spawned threads; wait for them so a mutation
        // returns only after its snapshot has been delivered.
        for handle in handles {
            let _ = handle.join();
        }
        Ok(())
    }
}

impl AccountStore for InMemoryStore {
    fn load_all<M: Model>(&self, account: &AccountId) -> Result<Vec<M>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;

        let prefix = collection_prefix::<M>(account);
        let mut models = Vec::new();
        for (path, bytes) in storage.range(prefix.clone()..) {
            if !path.starts_with(&prefix) {
                break;
            }
            let model: M =
                serde_json::from_slice(bytes).map_err(|e| StoreError::Serde(e.to_string()))?;
            models.push(model);
        }
        Ok(models)
    }

    fn write_model<M: Model>(&self, account: &AccountId, model: &M) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(model).map_err(|e| StoreError::Serde(e.to_string()))?;
        {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StoreError::LockPoisoned("write"))?;
            storage.insert(model_path::<M>(account, model.id()), bytes);
        }
        self.notify(account)
    }

    fn delete_model<M: Model>(&self, account: &AccountId, id: &str) -> Result<bool, StoreError> {
        let existed = {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StoreError::LockPoisoned("write"))?;
            storage.remove(&model_path::<M>(account, id)).is_some()
        };
        self.notify(account)?;
        Ok(existed)
    }

    fn commit(&self, writes: WriteSet) -> Result<(), StoreError> {
        let (account, ops) = writes.into_parts();
        {
            // One write-lock scope: readers see all ops or none.
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StoreError::LockPoisoned("commit"))?;
            for (path, op) in ops.iter() {
                match op {
                    WriteOp::Put(bytes) => {
                        storage.insert(path.clone(), bytes.clone());
                    }
                    WriteOp::Tombstone => {
                        storage.remove(path);
                    }
                }
            }
        }
        debug!("committed {} ops for account {}", ops.len(), account);
        self.notify(&account)
    }

    fn snapshot(&self, account: &AccountId) -> Result<AccountSnapshot, StoreError> {
        Ok(AccountSnapshot {
            products: self.load_all::<Product>(account)?,
            transactions: self.load_all::<StockTransaction>(account)?,
        })
    }

    fn subscribe<F>(&self, account: &AccountId, listener: F) -> Result<(), StoreError>
    where
        F: Fn(AccountSnapshot) + Send + Sync + 'static,
    {
        // Deliver the current state up front, then on every mutation.
        listener(self.snapshot(account)?);

        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| StoreError::LockPoisoned("emitter"))?;
        emitter.on(&Self::account_event(account), move |payload: String| {
            if let Ok(snapshot) = serde_json::from_str::<AccountSnapshot>(&payload) {
                listener(snapshot);
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ColorVariation, SizeVariation};

    fn account() -> AccountId {
        AccountId::from("acct-1")
    }

    fn shoe() -> Product {
        Product::new(
            "Air Max",
            vec![ColorVariation::new("Black", vec![SizeVariation::new("10", 5)])],
        )
    }

    #[test]
    fn write_and_load() {
        let store = InMemoryStore::new();
        let product = shoe();
        store.write_model(&account(), &product).unwrap();

        let loaded = store.load_all::<Product>(&account()).unwrap();
        assert_eq!(loaded, vec![product]);
    }

    #[test]
    fn delete_reports_existence() {
        let store = InMemoryStore::new();
        let product = shoe();
        store.write_model(&account(), &product).unwrap();

        assert!(store.delete_model::<Product>(&account(), &product.id).unwrap());
        assert!(!store.delete_model::<Product>(&account(), &product.id).unwrap());
        assert!(store.load_all::<Product>(&account()).unwrap().is_empty());
    }

    #[test]
    fn accounts_are_isolated() {
        let store = InMemoryStore::new();
        let product = shoe();
        store.write_model(&account(), &product).unwrap();

        let other = AccountId::from("acct-2");
        assert!(store.load_all::<Product>(&other).unwrap().is_empty());
        assert_eq!(store.snapshot(&other).unwrap(), AccountSnapshot::default());
    }

    #[test]
    fn commit_applies_the_whole_batch() {
        let store = InMemoryStore::new();
        let kept = shoe();
        let removed = shoe();
        store.write_model(&account(), &removed).unwrap();

        let writes = WriteSet::for_account(&account())
            .put(&kept)
            .tombstone::<Product>(&removed.id);
        store.commit(writes).unwrap();

        let loaded = store.load_all::<Product>(&account()).unwrap();
        assert_eq!(loaded, vec![kept]);
    }

    #[test]
    fn subscribe_pushes_current_then_updated_snapshots() {
        let store = InMemoryStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        store
            .subscribe(&account(), move |snapshot: AccountSnapshot| {
                sink.lock().unwrap().push(snapshot.products.len());
            })
            .unwrap();

        store.write_model(&account(), &shoe()).unwrap();
        store.write_model(&account(), &shoe()).unwrap();

        // Initial empty snapshot, then one per write.
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn subscribers_only_see_their_account() {
        let store = InMemoryStore::new();
        let seen = Arc::new(Mutex::new(0usize));

        let sink = Arc::clone(&seen);
        store
            .subscribe(&AccountId::from("acct-2"), move |_| {
                *sink.lock().unwrap() += 1;
            })
            .unwrap();

        store.write_model(&account(), &shoe()).unwrap();
        // Only the initial push; acct-1 writes never reach acct-2.
        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
