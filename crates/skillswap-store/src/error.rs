/// Errors from store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An insert collided with an existing record id.
    #[error("record already exists: {0}")]
    DuplicateId(String),

    /// A save targeted a record that was never inserted.
    #[error("record not found for save: {0}")]
    UnknownId(String),

    /// A lock guarding store state was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// I/O or backend failure in a persistent implementation.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
