//! Error types shared by the SQLite storage implementation.

use thiserror::Error;

use crate::dao::models::{PhotoId, UserId};

/// Convenient result alias returning [`SqliteDaoError`] failures.
pub type SqliteResult<T> = Result<T, SqliteDaoError>;

/// Failures that can occur while interacting with SQLite.
#[derive(Debug, Error)]
pub enum SqliteDaoError {
    /// Opening the connection pool failed.
    #[error("failed to connect to SQLite database `{url}`")]
    Connect {
        /// Connection string that was used.
        url: String,
        /// Error reported by sqlx.
        #[source]
        source: sqlx::Error,
    },
    /// Creating the photos table or its index failed.
    #[error("failed to create SQLite schema")]
    Schema {
        /// Error reported by sqlx.
        #[source]
        source: sqlx::Error,
    },
    /// Listing the photos of a user failed.
    #[error("failed to list photos of user `{user}`")]
    ListPhotos {
        /// Owner of the photos.
        user: UserId,
        /// Error reported by sqlx.
        #[source]
        source: sqlx::Error,
    },
    /// Fetching a single photo failed.
    #[error("failed to fetch photo `{id}`")]
    FetchPhoto {
        /// Requested photo.
        id: PhotoId,
        /// Error reported by sqlx.
        #[source]
        source: sqlx::Error,
    },
    /// Inserting a photo failed.
    #[error("failed to insert photo for user `{user}`")]
    InsertPhoto {
        /// Owner of the photos.
        user: UserId,
        /// Error reported by sqlx.
        #[source]
        source: sqlx::Error,
    },
    /// A row could not be mapped into a [`crate::dao::models::PhotoRecord`].
    #[error("failed to decode photo row")]
    DecodeRow {
        /// Error reported by sqlx.
        #[source]
        source: sqlx::Error,
    },
    /// The `SELECT 1` round-trip failed.
    #[error("SQLite health check failed")]
    HealthCheck {
        /// Error reported by sqlx.
        #[source]
        source: sqlx::Error,
    },
}
