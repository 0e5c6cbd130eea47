use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{ReceiptId, ScoredReceipt};

/// Storage abstraction for scored receipts. Implementations must tolerate concurrent callers.
pub trait ReceiptStore: Send + Sync {
    /// Saves the receipt under a freshly generated identifier.
    fn insert(&self, receipt: ScoredReceipt) -> Result<ReceiptId, StoreError>;
    fn fetch(&self, id: &ReceiptId) -> Result<Option<ScoredReceipt>, StoreError>;
    /// Every stored receipt, ordered by identifier.
    fn snapshot(&self) -> Result<BTreeMap<ReceiptId, ScoredReceipt>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("receipt not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Mutex-guarded map. Contents are lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryReceiptStore {
    records: Arc<Mutex<HashMap<ReceiptId, ScoredReceipt>>>,
}

impl InMemoryReceiptStore {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<ReceiptId, ScoredReceipt>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("receipt store mutex poisoned".to_string()))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.records()?.is_empty())
    }
}

impl ReceiptStore for InMemoryReceiptStore {
    fn insert(&self, receipt: ScoredReceipt) -> Result<ReceiptId, StoreError> {
        let mut guard = self.records()?;
        loop {
            let id = ReceiptId::generate();
            if let Entry::Vacant(slot) = guard.entry(id.clone()) {
                slot.insert(receipt);
                return Ok(id);
            }
        }
    }

    fn fetch(&self, id: &ReceiptId) -> Result<Option<ScoredReceipt>, StoreError> {
        Ok(self.records()?.get(id).cloned())
    }

    fn snapshot(&self) -> Result<BTreeMap<ReceiptId, ScoredReceipt>, StoreError> {
        Ok(self
            .records()?
            .iter()
            .map(|(id, receipt)| (id.clone(), receipt.clone()))
            .collect())
    }
}
