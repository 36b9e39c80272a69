use std::error::Error;
use thiserror::Error;

/// Result alias for photo store operations.
pub type StorageResult<T> = Result<T, StorageError>;

type BoxedSource = Box<dyn Error + Send + Sync>;

/// Failure reported by a photo store, whatever database sits behind it.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or rejected the query.
    #[error("photo store unreachable: {message}")]
    Unreachable {
        /// Description of the backend failure.
        message: String,
        /// Backend error that caused the failure.
        #[source]
        source: BoxedSource,
    },
    /// A stored photo could not be read back.
    #[error("photo record unreadable: {message}")]
    Corrupted {
        /// Description of the backend failure.
        message: String,
        /// Backend error that caused the failure.
        #[source]
        source: BoxedSource,
    },
}

impl StorageError {
    /// Wrap a backend failure that prevented the query from running.
    pub fn unreachable(source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unreachable {
            message: source.to_string(),
            source: Box::new(source),
        }
    }

    /// Wrap a failure to decode a stored record.
    pub fn corrupted(source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Corrupted {
            message: source.to_string(),
            source: Box::new(source),
        }
    }
}
