use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Identifier assigned by the contact store when a record is created.
pub type StoreId = Uuid;

/// A normalized contact candidate produced from one source row.
///
/// Created once during extraction and consumed exactly once by the
/// import policy. Field values are already trimmed; empty optional
/// fields are `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Sheet this row came from.
    pub source_sheet: String,
    /// 1-based data row index within the sheet, excluding the header row.
    pub raw_row_index: usize,
    /// Columns that did not map to a known field.
    pub extra_fields: HashMap<String, String>,
}

impl CandidateContact {
    /// A candidate is importable only if it carries at least one
    /// identifying field.
    pub fn has_identity(&self) -> bool {
        !self.name.is_empty() || self.email.is_some() || self.phone.is_some()
    }
}

/// A contact as it exists in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredContact {
    pub id: StoreId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub extra_fields: HashMap<String, String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl StoredContact {
    /// Overlay non-empty incoming fields on this record. Empty incoming
    /// fields never clear existing values.
    pub fn merge_from(&mut self, candidate: &CandidateContact) {
        if !candidate.name.is_empty() {
            self.name = candidate.name.clone();
        }
        if candidate.email.is_some() {
            self.email = candidate.email.clone();
        }
        if candidate.phone.is_some() {
            self.phone = candidate.phone.clone();
        }
        if candidate.company.is_some() {
            self.company = candidate.company.clone();
        }
        for (column, value) in &candidate.extra_fields {
            if !value.is_empty() {
                self.extra_fields.insert(column.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, email: Option<&str>, phone: Option<&str>) -> CandidateContact {
        CandidateContact {
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            company: None,
            source_sheet: "contacts".to_string(),
            raw_row_index: 1,
            extra_fields: HashMap::new(),
        }
    }

    #[test]
    fn test_has_identity() {
        assert!(candidate("Ada Lovelace", None, None).has_identity());
        assert!(candidate("", Some("ada@example.com"), None).has_identity());
        assert!(candidate("", None, Some("555-0100")).has_identity());
        assert!(!candidate("", None, None).has_identity());
    }

    #[test]
    fn test_merge_keeps_existing_when_incoming_empty() {
        let mut existing = StoredContact {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: Some("5550100".to_string()),
            company: Some("Analytical Engines".to_string()),
            extra_fields: HashMap::from([("title".to_string(), "Countess".to_string())]),
            created_at: 0,
            updated_at: 0,
        };

        let mut incoming = candidate("", None, Some("5550199"));
        incoming
            .extra_fields
            .insert("city".to_string(), "London".to_string());
        existing.merge_from(&incoming);

        assert_eq!(existing.name, "Ada Lovelace");
        assert_eq!(existing.email.as_deref(), Some("ada@example.com"));
        assert_eq!(existing.phone.as_deref(), Some("5550199"));
        assert_eq!(existing.extra_fields.get("title").unwrap(), "Countess");
        assert_eq!(existing.extra_fields.get("city").unwrap(), "London");
    }
}
