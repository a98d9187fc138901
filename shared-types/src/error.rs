/// Fatal errors. Any of these aborts the run before a batch executes.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("source unreadable: {0}")]
    SourceUnreadable(String),

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors surfaced by a contact store operation.
///
/// `Unavailable` and `Rejected` are record-level: the record is marked
/// failed and the batch continues. `ConnectionLost` is batch-level: the
/// batch's remaining records are marked failed and other batches keep
/// running.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store rejected record: {0}")]
    Rejected(String),

    #[error("store connection lost: {0}")]
    ConnectionLost(String),
}
