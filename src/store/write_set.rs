use crate::catalog::Model;
use crate::identity::AccountId;

/// One write in an atomic batch: a full JSON value or a deletion marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put(Vec<u8>),
    Tombstone,
}

/// Builder collecting path-addressed writes for one atomic commit.
///
/// Chain methods in any order; nothing touches the store until the whole
/// set is handed to [`AccountStore::commit`](super::AccountStore::commit).
#[derive(Debug, Clone)]
pub struct WriteSet {
    account: AccountId,
    ops: Vec<(String, WriteOp)>,
}

impl WriteSet {
    /// Start an empty write set scoped to one account.
    pub fn for_account(account: &AccountId) -> Self {
        WriteSet {
            account: account.clone(),
            ops: Vec::new(),
        }
    }

    /// Queue a full-record write for a model.
    pub fn put<M: Model>(mut self, model: &M) -> Self {
        let bytes = serde_json::to_vec(model).expect("model serialization should not fail");
        self.ops
            .push((model_path::<M>(&self.account, model.id()), WriteOp::Put(bytes)));
        self
    }

    /// Queue a deletion for a model id.
    pub fn tombstone<M: Model>(mut self, id: &str) -> Self {
        self.ops
            .push((model_path::<M>(&self.account, id), WriteOp::Tombstone));
        self
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn ops(&self) -> &[(String, WriteOp)] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub(crate) fn into_parts(self) -> (AccountId, Vec<(String, WriteOp)>) {
        (self.account, self.ops)
    }
}

/// Full storage path for one model instance.
pub(crate) fn model_path<M: Model>(account: &AccountId, id: &str) -> String {
    format!("accounts/{}/{}/{}", account, M::COLLECTION, id)
}

/// Path prefix covering a whole collection for one account.
pub(crate) fn collection_prefix<M: Model>(account: &AccountId) -> String {
    format!("accounts/{}/{}/", account, M::COLLECTION)
}
