mod error;
mod schema;
/// Pool-backed store and its trait implementation.
pub mod store;

pub use error::SqliteDaoError;
pub use store::SqlitePhotoStore;

use crate::dao::storage::StorageError;

impl From<SqliteDaoError> for StorageError {
    fn from(err: SqliteDaoError) -> Self {
        match err {
            SqliteDaoError::DecodeRow { .. } => StorageError::corrupted(err),
            _ => StorageError::unreachable(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failures_are_reported_as_corruption() {
        let err: StorageError = SqliteDaoError::DecodeRow {
            source: sqlx::Error::ColumnNotFound("label".into()),
        }
        .into();
        assert!(matches!(err, StorageError::Corrupted { .. }));

        let err: StorageError = SqliteDaoError::HealthCheck {
            source: sqlx::Error::PoolTimedOut,
        }
        .into();
        assert!(matches!(err, StorageError::Unreachable { .. }));
        assert!(err.to_string().contains("health check"));
    }
}
