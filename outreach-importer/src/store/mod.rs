pub mod memory;
pub mod rest;

pub use memory::MemoryContactStore;
pub use rest::RestContactStore;

use async_trait::async_trait;
use shared_types::{CandidateContact, MatchKey, StoreError, StoreId, StoredContact};

/// Destination for imported contacts.
///
/// Implementations must be safe for concurrent use: one instance is
/// shared by every worker task in the pool.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Look up an existing contact by its match key.
    async fn find_by_match_key(&self, key: &MatchKey)
        -> Result<Option<StoredContact>, StoreError>;

    /// Persist a new contact, returning the store-assigned id.
    async fn create(&self, contact: &CandidateContact) -> Result<StoreId, StoreError>;

    /// Replace an existing contact with its merged form.
    async fn update(&self, id: StoreId, contact: &StoredContact) -> Result<(), StoreError>;
}
