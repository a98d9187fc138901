use super::{RawRow, SheetRows, TabularSource};
use shared_types::ImportError;

/// In-memory tabular source for embedding and tests.
///
/// Cells are positional against the sheet's header list; a row may carry
/// `Err(detail)` to stand in for an unreadable source row.
pub struct MemorySource {
    sheets: Vec<MemorySheet>,
}

struct MemorySheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Result<Vec<String>, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self { sheets: Vec::new() }
    }

    pub fn with_sheet(mut self, name: &str, headers: &[&str], rows: Vec<Vec<&str>>) -> Self {
        self.sheets.push(MemorySheet {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|row| Ok(row.into_iter().map(str::to_string).collect()))
                .collect(),
        });
        self
    }

    /// Append a row that fails to decode, for malformed-row handling.
    pub fn with_bad_row(mut self, sheet: &str, detail: &str) -> Self {
        if let Some(entry) = self.sheets.iter_mut().find(|s| s.name == sheet) {
            entry.rows.push(Err(detail.to_string()));
        }
        self
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl TabularSource for MemorySource {
    fn list_sheets(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn read_rows(&self, sheet: &str) -> Result<SheetRows, ImportError> {
        let entry = self
            .sheets
            .iter()
            .find(|s| s.name == sheet)
            .ok_or_else(|| ImportError::SheetNotFound(sheet.to_string()))?;

        let headers = entry.headers.clone();
        let header_list = headers.clone();
        let rows: Vec<Result<RawRow, String>> = entry
            .rows
            .iter()
            .map(|row| match row {
                Ok(cells) => {
                    let mut map = RawRow::new();
                    for (i, cell) in cells.iter().enumerate() {
                        if let Some(header) = header_list.get(i) {
                            map.insert(header.clone(), cell.clone());
                        }
                    }
                    Ok(map)
                }
                Err(detail) => Err(detail.clone()),
            })
            .collect();

        Ok(SheetRows {
            headers,
            rows: Box::new(rows.into_iter()),
        })
    }
}
