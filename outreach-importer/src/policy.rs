use crate::store::ContactStore;
use shared_types::{CandidateContact, ImportOutcome, MatchKey, StoreError};
use std::sync::Arc;

/// Mode flags for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportMode {
    /// Merge non-empty incoming fields into a matching contact.
    pub update_existing: bool,
    /// Never touch contacts that already exist.
    pub import_only_new: bool,
    /// Classify outcomes without writing to the store.
    pub dry_run: bool,
}

/// Per-record insert/update/skip decision against the contact store.
#[derive(Clone)]
pub struct UpsertPolicy {
    store: Arc<dyn ContactStore>,
    mode: ImportMode,
}

impl UpsertPolicy {
    pub fn new(store: Arc<dyn ContactStore>, mode: ImportMode) -> Self {
        Self { store, mode }
    }

    /// Decide and apply the outcome for one candidate. Store errors
    /// propagate to the caller; it decides whether they end the batch.
    pub async fn apply(&self, candidate: &CandidateContact) -> Result<ImportOutcome, StoreError> {
        let Some(key) = MatchKey::derive(candidate) else {
            // Identifying fields present but none normalizes to a usable
            // key, e.g. a phone of three digits. Without a key the record
            // cannot be deduplicated, so it is not written.
            return Ok(ImportOutcome::Failed(
                "no usable match key".to_string(),
            ));
        };

        match self.store.find_by_match_key(&key).await? {
            None => {
                if !self.mode.dry_run {
                    self.store.create(candidate).await?;
                }
                Ok(ImportOutcome::Created)
            }
            Some(existing) => {
                // import-only-new wins when both flags are set.
                if self.mode.import_only_new {
                    return Ok(ImportOutcome::SkippedDuplicate);
                }
                if self.mode.update_existing {
                    if !self.mode.dry_run {
                        let mut merged = existing;
                        merged.merge_from(candidate);
                        self.store.update(merged.id, &merged).await?;
                    }
                    return Ok(ImportOutcome::Updated);
                }
                Ok(ImportOutcome::SkippedDuplicate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryContactStore;
    use std::collections::HashMap;

    fn candidate(name: &str, email: Option<&str>, phone: Option<&str>) -> CandidateContact {
        CandidateContact {
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            company: None,
            source_sheet: "edu".to_string(),
            raw_row_index: 1,
            extra_fields: HashMap::new(),
        }
    }

    fn policy(store: &Arc<MemoryContactStore>, mode: ImportMode) -> UpsertPolicy {
        let store: Arc<dyn ContactStore> = store.clone();
        UpsertPolicy::new(store, mode)
    }

    #[tokio::test]
    async fn test_new_record_is_created() {
        let store = Arc::new(MemoryContactStore::new());
        let policy = policy(&store, ImportMode::default());

        let outcome = policy
            .apply(&candidate("Ada", Some("ada@example.com"), None))
            .await
            .unwrap();
        assert_eq!(outcome, ImportOutcome::Created);
        assert_eq!(store.contact_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_is_skipped_by_default() {
        let store = Arc::new(MemoryContactStore::new());
        let policy = policy(&store, ImportMode::default());

        policy
            .apply(&candidate("Ada", Some("ada@example.com"), None))
            .await
            .unwrap();
        let outcome = policy
            .apply(&candidate("Ada L.", Some("ada@example.com"), None))
            .await
            .unwrap();
        assert_eq!(outcome, ImportOutcome::SkippedDuplicate);
        assert_eq!(store.contact_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_existing_merges_fields() {
        let store = Arc::new(MemoryContactStore::new());
        let create_policy = policy(&store, ImportMode::default());
        let id = match create_policy
            .apply(&candidate("Ada", Some("ada@example.com"), None))
            .await
            .unwrap()
        {
            ImportOutcome::Created => {
                let key = MatchKey::Email("ada@example.com".to_string());
                store.find_by_match_key(&key).await.unwrap().unwrap().id
            }
            other => panic!("expected created, got {:?}", other),
        };

        let update_policy = policy(
            &store,
            ImportMode {
                update_existing: true,
                ..Default::default()
            },
        );
        let outcome = update_policy
            .apply(&candidate("", Some("ada@example.com"), Some("555-0100-12")))
            .await
            .unwrap();
        assert_eq!(outcome, ImportOutcome::Updated);

        let updated = store.get(id).await.unwrap();
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.phone.as_deref(), Some("555-0100-12"));
    }

    #[tokio::test]
    async fn test_import_only_new_skips_match() {
        let store = Arc::new(MemoryContactStore::new());
        policy(&store, ImportMode::default())
            .apply(&candidate("Ada", Some("ada@example.com"), None))
            .await
            .unwrap();

        let only_new = policy(
            &store,
            ImportMode {
                import_only_new: true,
                ..Default::default()
            },
        );
        let outcome = only_new
            .apply(&candidate("Ada", Some("ada@example.com"), None))
            .await
            .unwrap();
        assert_eq!(outcome, ImportOutcome::SkippedDuplicate);
        assert_eq!(store.write_calls().1, 0);
    }

    #[tokio::test]
    async fn test_import_only_new_wins_over_update_existing() {
        let store = Arc::new(MemoryContactStore::new());
        policy(&store, ImportMode::default())
            .apply(&candidate("Ada", Some("ada@example.com"), None))
            .await
            .unwrap();

        let both = policy(
            &store,
            ImportMode {
                update_existing: true,
                import_only_new: true,
                ..Default::default()
            },
        );
        let outcome = both
            .apply(&candidate("Ada", Some("ada@example.com"), None))
            .await
            .unwrap();
        assert_eq!(outcome, ImportOutcome::SkippedDuplicate);
        assert_eq!(store.write_calls().1, 0);
    }

    #[tokio::test]
    async fn test_dry_run_classifies_without_writing() {
        let store = Arc::new(MemoryContactStore::new());
        store
            .create(&candidate("Grace", Some("grace@example.com"), None))
            .await
            .unwrap();
        let before = store.write_calls();

        let dry = policy(
            &store,
            ImportMode {
                update_existing: true,
                dry_run: true,
                ..Default::default()
            },
        );
        assert_eq!(
            dry.apply(&candidate("Ada", Some("ada@example.com"), None))
                .await
                .unwrap(),
            ImportOutcome::Created
        );
        assert_eq!(
            dry.apply(&candidate("Grace", Some("grace@example.com"), None))
                .await
                .unwrap(),
            ImportOutcome::Updated
        );
        assert_eq!(store.write_calls(), before);
        assert_eq!(store.contact_count().await, 1);
    }

    #[tokio::test]
    async fn test_unusable_key_is_failed_not_written() {
        let store = Arc::new(MemoryContactStore::new());
        let policy = policy(&store, ImportMode::default());

        let outcome = policy
            .apply(&candidate("", None, Some("123")))
            .await
            .unwrap();
        assert!(matches!(outcome, ImportOutcome::Failed(_)));
        assert_eq!(store.contact_count().await, 0);
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let store = Arc::new(MemoryContactStore::new());
        let key = MatchKey::Email("down@example.com".to_string());
        store
            .fail_on(key, StoreError::ConnectionLost("socket closed".to_string()))
            .await;

        let policy = policy(&store, ImportMode::default());
        let err = policy
            .apply(&candidate("Down", Some("down@example.com"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConnectionLost(_)));
    }
}
