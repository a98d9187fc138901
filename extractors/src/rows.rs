use crate::header_map::{Field, HeaderAliases, ResolvedHeaders};
use crate::tabular::{RawRow, TabularSource};
use shared_types::{CandidateContact, Extracted, ImportError, SkipReason};
use std::collections::HashMap;

/// Turns raw sheet rows into contact candidates.
///
/// Header aliases are resolved once per sheet; every row then goes
/// through the same fixed mapping. Rows without any identifying field
/// and rows the source could not decode are emitted as skips, never as
/// errors.
pub struct RowExtractor {
    aliases: HeaderAliases,
}

impl RowExtractor {
    pub fn new(aliases: HeaderAliases) -> Self {
        Self { aliases }
    }

    /// Single forward pass over one sheet, yielding `(row_index, item)`
    /// with 1-based data row indices.
    pub fn extract_sheet<'a>(
        &'a self,
        source: &dyn TabularSource,
        sheet: &'a str,
    ) -> Result<impl Iterator<Item = (usize, Extracted)> + Send + 'a, ImportError> {
        let sheet_rows = source.read_rows(sheet)?;
        let resolved = self.aliases.resolve(&sheet_rows.headers);
        let sheet_name = sheet.to_string();

        Ok(sheet_rows
            .rows
            .enumerate()
            .map(move |(i, row)| (i + 1, extract_row(row, i + 1, &sheet_name, &resolved))))
    }
}

fn extract_row(
    row: Result<RawRow, String>,
    row_index: usize,
    sheet: &str,
    resolved: &ResolvedHeaders,
) -> Extracted {
    let row = match row {
        Ok(row) => row,
        Err(detail) => {
            tracing::warn!(sheet, row_index, "skipping unreadable row: {}", detail);
            return Extracted::Skip(SkipReason::Malformed(detail));
        }
    };

    let field_value = |field: Field| -> Option<String> {
        resolved
            .header_for(field)
            .and_then(|header| row.get(header))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let name = field_value(Field::Name).unwrap_or_default();
    let email = field_value(Field::Email);
    let phone = field_value(Field::Phone);
    let company = field_value(Field::Company);

    let mut extra_fields = HashMap::new();
    for (header, value) in &row {
        let value = value.trim();
        if !resolved.is_mapped(header) && !value.is_empty() {
            extra_fields.insert(header.clone(), value.to_string());
        }
    }

    let candidate = CandidateContact {
        name,
        email,
        phone,
        company,
        source_sheet: sheet.to_string(),
        raw_row_index: row_index,
        extra_fields,
    };

    if !candidate.has_identity() {
        return Extracted::Skip(SkipReason::Empty);
    }

    Extracted::Contact(candidate)
}
