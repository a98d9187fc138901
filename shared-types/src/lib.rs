//! Shared Types Crate
//!
//! Domain types shared across the import engine: contact records, match
//! keys, per-record outcomes, run summaries, and the error taxonomy.
//! No I/O lives here.

pub mod contact;
pub mod error;
pub mod match_key;
pub mod outcome;
pub mod summary;

pub use contact::{CandidateContact, StoreId, StoredContact};
pub use error::{ImportError, StoreError};
pub use match_key::{normalize_email, normalize_phone, MatchKey};
pub use outcome::{BatchResult, Extracted, ImportOutcome, RecordOutcome, SkipReason};
pub use summary::{ImportCounters, RunSummary};
