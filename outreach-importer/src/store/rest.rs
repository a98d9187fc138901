use super::ContactStore;
use crate::config::StoreConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use shared_types::{CandidateContact, MatchKey, StoreError, StoreId, StoredContact};
use std::collections::HashMap;
use uuid::Uuid;

const DEFAULT_TABLE: &str = "contacts";

/// Contact store backed by a hosted Postgres REST endpoint.
///
/// Lookups filter on the `match_key` column, which this client writes on
/// every create and update, so a contact is found under the same key the
/// importer derives locally.
pub struct RestContactStore {
    client: reqwest::Client,
    base_url: String,
    table: String,
    api_key: Option<String>,
}

/// Wire form of one row in the contacts table.
#[derive(Debug, Serialize, Deserialize)]
struct ContactRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    match_key: Option<String>,
    extra_fields: HashMap<String, String>,
    created_at: i64,
    updated_at: i64,
}

impl From<ContactRow> for StoredContact {
    fn from(row: ContactRow) -> Self {
        StoredContact {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            extra_fields: row.extra_fields,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl RestContactStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            table: config
                .table
                .clone()
                .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            api_key: config.api_key.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.base_url, self.table)
    }

    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder
                .header("apikey", key)
                .bearer_auth(key),
            None => builder,
        }
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }
}

fn classify_status(status: StatusCode, body: &str) -> StoreError {
    if status.is_server_error() {
        StoreError::Unavailable(format!("{}: {}", status, body))
    } else {
        StoreError::Rejected(format!("{}: {}", status, body))
    }
}

fn classify_transport(error: reqwest::Error) -> StoreError {
    if error.is_connect() || error.is_timeout() {
        StoreError::ConnectionLost(error.to_string())
    } else {
        StoreError::Unavailable(error.to_string())
    }
}

/// PostgREST equality filter for a match key.
fn key_filter(key: &MatchKey) -> String {
    format!("eq.{}", key.as_canonical())
}

fn id_filter(id: StoreId) -> String {
    format!("eq.{}", id)
}

#[async_trait]
impl ContactStore for RestContactStore {
    async fn find_by_match_key(
        &self,
        key: &MatchKey,
    ) -> Result<Option<StoredContact>, StoreError> {
        let request = self
            .client
            .get(self.table_url())
            .query(&[("match_key", key_filter(key)), ("limit", "1".to_string())]);

        let response = self
            .with_auth(request)
            .send()
            .await
            .map_err(classify_transport)?;
        let response = self.check(response).await?;

        let mut rows: Vec<ContactRow> = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(rows.pop().map(StoredContact::from))
    }

    async fn create(&self, contact: &CandidateContact) -> Result<StoreId, StoreError> {
        let now = chrono::Utc::now().timestamp();
        let row = ContactRow {
            id: Uuid::new_v4(),
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            company: contact.company.clone(),
            match_key: MatchKey::derive(contact).map(|k| k.as_canonical()),
            extra_fields: contact.extra_fields.clone(),
            created_at: now,
            updated_at: now,
        };

        let request = self.client.post(self.table_url()).json(&row);
        let response = self
            .with_auth(request)
            .send()
            .await
            .map_err(classify_transport)?;
        self.check(response).await?;
        Ok(row.id)
    }

    async fn update(&self, id: StoreId, contact: &StoredContact) -> Result<(), StoreError> {
        let row = ContactRow {
            id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            company: contact.company.clone(),
            match_key: MatchKey::of_stored(contact).map(|k| k.as_canonical()),
            extra_fields: contact.extra_fields.clone(),
            created_at: contact.created_at,
            updated_at: chrono::Utc::now().timestamp(),
        };

        let request = self
            .client
            .patch(self.table_url())
            .query(&[("id", id_filter(id))])
            .json(&row);
        let response = self
            .with_auth(request)
            .send()
            .await
            .map_err(classify_transport)?;
        self.check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_transient() {
        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, StoreError::Unavailable(_)));

        let err = classify_status(StatusCode::SERVICE_UNAVAILABLE, "maintenance");
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_client_errors_are_rejections() {
        let err = classify_status(StatusCode::CONFLICT, "duplicate key");
        assert!(matches!(err, StoreError::Rejected(reason) if reason.contains("duplicate key")));

        let err = classify_status(StatusCode::BAD_REQUEST, "missing column");
        assert!(matches!(err, StoreError::Rejected(_)));
    }

    #[test]
    fn test_key_filter_uses_canonical_form() {
        let key = MatchKey::Email("ada@example.com".to_string());
        assert_eq!(key_filter(&key), "eq.email:ada@example.com");

        let key = MatchKey::Phone("5550100123".to_string());
        assert_eq!(key_filter(&key), "eq.phone:5550100123");
    }

    #[test]
    fn test_store_url_shape() {
        let store = RestContactStore::new(&StoreConfig {
            url: "https://db.example.com/rest/v1/".to_string(),
            table: None,
            api_key: None,
        });
        assert_eq!(store.table_url(), "https://db.example.com/rest/v1/contacts");
    }
}
