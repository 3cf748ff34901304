//! Persistence failure taxonomy reported by [`crate::PrefsStore`] implementations.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failure raised while reading or writing persisted values.
///
/// Callers are expected to log these and keep operating on in-memory state.
pub enum PersistenceError {
    /// The durable medium is not reachable on this host (for example, no `localStorage`).
    #[error("storage unavailable")]
    Unavailable,
    /// The medium rejected a write because its quota is exhausted.
    #[error("storage quota exceeded")]
    QuotaExceeded,
    /// The backend reported a read/write/delete failure.
    #[error("storage backend failure: {0}")]
    Backend(String),
    /// A value could not be encoded to JSON text.
    #[error("serialize failed: {0}")]
    Serialize(String),
    /// Stored JSON text could not be decoded into the requested type.
    #[error("deserialize failed: {0}")]
    Deserialize(String),
}
