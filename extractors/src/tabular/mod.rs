mod csv_source;
mod memory;

pub use csv_source::CsvSource;
pub use memory::MemorySource;

use shared_types::ImportError;
use std::collections::HashMap;

/// One raw data row: header name to cell value, as read from the source.
pub type RawRow = HashMap<String, String>;

/// A single forward pass over one sheet: the header list plus a row
/// iterator. Rows that cannot be decoded come through as `Err` with a
/// detail message and do not end the pass.
pub struct SheetRows {
    pub headers: Vec<String>,
    pub rows: Box<dyn Iterator<Item = Result<RawRow, String>> + Send>,
}

impl std::fmt::Debug for SheetRows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetRows")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// A tabular source of one or more named sheets.
pub trait TabularSource {
    /// Sheet names in the source's declared order.
    fn list_sheets(&self) -> Vec<String>;

    /// Open one sheet for a single forward pass.
    fn read_rows(&self, sheet: &str) -> Result<SheetRows, ImportError>;
}
