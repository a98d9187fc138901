use super::ContactStore;
use async_trait::async_trait;
use shared_types::{CandidateContact, MatchKey, StoreError, StoreId, StoredContact};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-process contact store.
///
/// Backs `--store memory` runs and tests. Supports injecting a failure
/// for a specific match key so record-level fault handling can be
/// exercised deterministically.
pub struct MemoryContactStore {
    inner: Mutex<MemoryInner>,
    failures: Mutex<HashMap<MatchKey, StoreError>>,
    create_calls: AtomicU64,
    update_calls: AtomicU64,
}

#[derive(Default)]
struct MemoryInner {
    by_id: HashMap<StoreId, StoredContact>,
    by_key: HashMap<MatchKey, StoreId>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInner::default()),
            failures: Mutex::new(HashMap::new()),
            create_calls: AtomicU64::new(0),
            update_calls: AtomicU64::new(0),
        }
    }

    /// Every operation touching `key` will fail with `error`.
    pub async fn fail_on(&self, key: MatchKey, error: StoreError) {
        self.failures.lock().await.insert(key, error);
    }

    /// `(create, update)` call counts, including failed attempts.
    pub fn write_calls(&self) -> (u64, u64) {
        (
            self.create_calls.load(Ordering::SeqCst),
            self.update_calls.load(Ordering::SeqCst),
        )
    }

    pub async fn contact_count(&self) -> usize {
        self.inner.lock().await.by_id.len()
    }

    pub async fn get(&self, id: StoreId) -> Option<StoredContact> {
        self.inner.lock().await.by_id.get(&id).cloned()
    }

    /// Seed an existing contact, as if created by an earlier run.
    pub async fn seed(&self, contact: StoredContact) {
        let mut inner = self.inner.lock().await;
        if let Some(key) = MatchKey::of_stored(&contact) {
            inner.by_key.insert(key, contact.id);
        }
        inner.by_id.insert(contact.id, contact);
    }

    async fn check_fault(&self, key: Option<&MatchKey>) -> Result<(), StoreError> {
        if let Some(key) = key {
            if let Some(error) = self.failures.lock().await.get(key) {
                return Err(error.clone());
            }
        }
        Ok(())
    }
}

impl Default for MemoryContactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn find_by_match_key(
        &self,
        key: &MatchKey,
    ) -> Result<Option<StoredContact>, StoreError> {
        self.check_fault(Some(key)).await?;
        let inner = self.inner.lock().await;
        Ok(inner
            .by_key
            .get(key)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    async fn create(&self, contact: &CandidateContact) -> Result<StoreId, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let key = MatchKey::derive(contact);
        self.check_fault(key.as_ref()).await?;

        let now = chrono::Utc::now().timestamp();
        let stored = StoredContact {
            id: Uuid::new_v4(),
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            company: contact.company.clone(),
            extra_fields: contact.extra_fields.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.lock().await;
        if let Some(key) = key {
            inner.by_key.insert(key, stored.id);
        }
        let id = stored.id;
        inner.by_id.insert(id, stored);
        Ok(id)
    }

    async fn update(&self, id: StoreId, contact: &StoredContact) -> Result<(), StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_fault(MatchKey::of_stored(contact).as_ref()).await?;

        let mut inner = self.inner.lock().await;
        let previous = inner
            .by_id
            .remove(&id)
            .ok_or_else(|| StoreError::Rejected(format!("unknown contact id {}", id)))?;

        // The merged record may index under a different key than before.
        if let Some(old_key) = MatchKey::of_stored(&previous) {
            inner.by_key.remove(&old_key);
        }
        let mut updated = contact.clone();
        updated.id = id;
        updated.created_at = previous.created_at;
        updated.updated_at = chrono::Utc::now().timestamp();
        if let Some(new_key) = MatchKey::of_stored(&updated) {
            inner.by_key.insert(new_key, id);
        }
        inner.by_id.insert(id, updated);
        Ok(())
    }
}
