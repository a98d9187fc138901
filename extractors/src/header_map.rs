use std::collections::HashMap;

/// Canonical contact fields a header can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Company,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Phone, Field::Company];
}

/// Accepted header spellings per canonical field.
///
/// Comparison ignores case, surrounding whitespace, and `-`/`_`/space
/// separators, so "E-Mail Address" and "email_address" both match the
/// `email address` alias.
#[derive(Debug, Clone)]
pub struct HeaderAliases {
    aliases: HashMap<Field, Vec<String>>,
}

impl Default for HeaderAliases {
    fn default() -> Self {
        let mut aliases = HashMap::new();
        aliases.insert(
            Field::Name,
            vec!["name", "full name", "contact name", "contact"],
        );
        aliases.insert(
            Field::Email,
            vec!["email", "e-mail", "email address", "mail"],
        );
        aliases.insert(
            Field::Phone,
            vec!["phone", "phone number", "mobile", "telephone", "tel"],
        );
        aliases.insert(
            Field::Company,
            vec!["company", "organization", "organisation", "company name", "employer"],
        );

        Self {
            aliases: aliases
                .into_iter()
                .map(|(field, list)| (field, list.into_iter().map(str::to_string).collect()))
                .collect(),
        }
    }
}

impl HeaderAliases {
    /// Extend a field's accepted spellings, e.g. from configuration.
    pub fn extend(&mut self, field: Field, extra: &[String]) {
        self.aliases
            .entry(field)
            .or_default()
            .extend(extra.iter().cloned());
    }

    fn matches(&self, field: Field, header: &str) -> bool {
        let folded = fold(header);
        self.aliases
            .get(&field)
            .map(|list| list.iter().any(|alias| fold(alias) == folded))
            .unwrap_or(false)
    }

    /// Resolve a sheet's header list into a fixed header-to-field mapping,
    /// done once per sheet before any row is read. The first matching
    /// header wins per field; later duplicates stay unmapped and flow into
    /// `extra_fields`.
    pub fn resolve(&self, headers: &[String]) -> ResolvedHeaders {
        let mut fields: HashMap<Field, String> = HashMap::new();
        for header in headers {
            for field in Field::ALL {
                if !fields.contains_key(&field) && self.matches(field, header) {
                    fields.insert(field, header.clone());
                    break;
                }
            }
        }
        ResolvedHeaders { fields }
    }
}

fn fold(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect()
}

/// Fixed mapping from canonical field to the actual header carrying it,
/// valid for one sheet.
#[derive(Debug, Clone)]
pub struct ResolvedHeaders {
    fields: HashMap<Field, String>,
}

impl ResolvedHeaders {
    pub fn header_for(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Whether a header carries one of the canonical fields.
    pub fn is_mapped(&self, header: &str) -> bool {
        self.fields.values().any(|mapped| mapped == header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_alias_spellings_resolve() {
        let aliases = HeaderAliases::default();
        let resolved = aliases.resolve(&headers(&["Full Name", "E-Mail Address", "Tel"]));

        assert_eq!(resolved.header_for(Field::Name), Some("Full Name"));
        assert_eq!(resolved.header_for(Field::Email), Some("E-Mail Address"));
        assert_eq!(resolved.header_for(Field::Phone), Some("Tel"));
        assert_eq!(resolved.header_for(Field::Company), None);
    }

    #[test]
    fn test_separator_and_case_folding() {
        let aliases = HeaderAliases::default();
        let resolved = aliases.resolve(&headers(&["EMAIL_ADDRESS", "phone-number"]));

        assert_eq!(resolved.header_for(Field::Email), Some("EMAIL_ADDRESS"));
        assert_eq!(resolved.header_for(Field::Phone), Some("phone-number"));
    }

    #[test]
    fn test_first_matching_header_wins() {
        let aliases = HeaderAliases::default();
        let resolved = aliases.resolve(&headers(&["Email", "Mail"]));

        assert_eq!(resolved.header_for(Field::Email), Some("Email"));
        assert!(!resolved.is_mapped("Mail"));
    }

    #[test]
    fn test_custom_aliases() {
        let mut aliases = HeaderAliases::default();
        aliases.extend(Field::Company, &["account".to_string()]);
        let resolved = aliases.resolve(&headers(&["Account"]));

        assert_eq!(resolved.header_for(Field::Company), Some("Account"));
    }

    #[test]
    fn test_unknown_headers_stay_unmapped() {
        let aliases = HeaderAliases::default();
        let resolved = aliases.resolve(&headers(&["Name", "Industry"]));

        assert!(resolved.is_mapped("Name"));
        assert!(!resolved.is_mapped("Industry"));
    }
}
