use crate::contact::{CandidateContact, StoredContact};
use serde::{Deserialize, Serialize};

/// Derived identity used to detect duplicate contacts.
///
/// Derivation priority: email, then phone, then name combined with
/// company. Two records with equal keys are the same contact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "value")]
pub enum MatchKey {
    Email(String),
    Phone(String),
    NameCompany(String),
}

impl MatchKey {
    /// Derive the match key for a candidate, or `None` when no field
    /// yields a usable identity.
    pub fn derive(candidate: &CandidateContact) -> Option<MatchKey> {
        Self::from_fields(
            &candidate.name,
            candidate.email.as_deref(),
            candidate.phone.as_deref(),
            candidate.company.as_deref(),
        )
    }

    /// Derive the match key a stored contact is indexed under.
    pub fn of_stored(contact: &StoredContact) -> Option<MatchKey> {
        Self::from_fields(
            &contact.name,
            contact.email.as_deref(),
            contact.phone.as_deref(),
            contact.company.as_deref(),
        )
    }

    fn from_fields(
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        company: Option<&str>,
    ) -> Option<MatchKey> {
        if let Some(email) = email {
            let normalized = normalize_email(email);
            if !normalized.is_empty() {
                return Some(MatchKey::Email(normalized));
            }
        }

        if let Some(phone) = phone {
            let normalized = normalize_phone(phone);
            if !normalized.is_empty() {
                return Some(MatchKey::Phone(normalized));
            }
        }

        let name = name.trim().to_lowercase();
        if !name.is_empty() {
            let company = company.map(|c| c.trim().to_lowercase()).unwrap_or_default();
            return Some(MatchKey::NameCompany(format!("{}|{}", name, company)));
        }

        None
    }

    /// Canonical string form, stable across runs. The store keeps this
    /// value alongside each contact so lookups are a single equality
    /// filter.
    pub fn as_canonical(&self) -> String {
        match self {
            MatchKey::Email(v) => format!("email:{}", v),
            MatchKey::Phone(v) => format!("phone:{}", v),
            MatchKey::NameCompany(v) => format!("name:{}", v),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Reduce a phone number to its digits. 11-digit numbers with a leading
/// country code `1` drop the prefix; anything shorter than 7 or longer
/// than 15 digits is not a usable key and normalizes to empty.
pub fn normalize_phone(phone: &str) -> String {
    let digits_only: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits_only.len() == 11 && digits_only.starts_with('1') {
        return digits_only[1..].to_string();
    }
    if (7..=15).contains(&digits_only.len()) {
        return digits_only;
    }
    String::new()
}
