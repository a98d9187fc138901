//! Extractors Crate
//!
//! This crate turns tabular sources into a stream of normalized contact
//! candidates. It is the read side of the import engine and performs no
//! store I/O.
//!
//! # Architecture
//!
//! - **Types**: Contact and outcome types live in the `shared-types` crate
//! - **Sources**: `TabularSource` implementations live in `tabular`
//! - **Mapping**: header aliasing and row normalization live here
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::{CsvSource, HeaderAliases, RowExtractor};
//!
//! let source = CsvSource::open("contacts/".as_ref())?;
//! let extractor = RowExtractor::new(HeaderAliases::default());
//! for item in extractor.extract_sheet(&source, "edu")? {
//!     // (row_index, Extracted)
//! }
//! ```

pub mod header_map;
pub mod rows;
pub mod tabular;

// Re-export commonly used types
pub use header_map::{Field, HeaderAliases, ResolvedHeaders};
pub use rows::RowExtractor;
pub use tabular::{CsvSource, MemorySource, RawRow, SheetRows, TabularSource};
