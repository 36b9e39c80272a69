use std::time::Duration;

use futures::future::BoxFuture;
use sqlx::{Row, SqlitePool, sqlite::SqlitePoolOptions, sqlite::SqliteRow};
use tracing::debug;

use super::{
    error::{SqliteDaoError, SqliteResult},
    schema::ensure_schema,
};
use crate::dao::{
    models::{NewPhoto, PhotoId, PhotoRecord, UserId},
    photo_store::PhotoStore,
    storage::StorageResult,
};

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// [`PhotoStore`] backed by a SQLite connection pool.
#[derive(Clone)]
pub struct SqlitePhotoStore {
    pool: SqlitePool,
}

impl SqlitePhotoStore {
    /// Open the pool for `database_url` and create the `Photos` table if needed.
    pub async fn connect(database_url: &str) -> SqliteResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await
            .map_err(|source| SqliteDaoError::Connect {
                url: database_url.to_owned(),
                source,
            })?;

        ensure_schema(&pool).await?;
        debug!(url = database_url, "SQLite photo store ready");

        Ok(Self { pool })
    }

    async fn list_photos_for_user(&self, user: UserId) -> SqliteResult<Vec<PhotoRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, url, label, userId
            FROM Photos
            WHERE userId = ?1
            ORDER BY id ASC
            ",
        )
        .bind(user.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|source| SqliteDaoError::ListPhotos { user, source })?;

        let mut photos = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(photo) = photo_from_row(&row)? {
                photos.push(photo);
            }
        }
        Ok(photos)
    }

    async fn get_photo_by_id(&self, id: PhotoId) -> SqliteResult<Option<PhotoRecord>> {
        let row = sqlx::query("SELECT id, url, label, userId FROM Photos WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|source| SqliteDaoError::FetchPhoto { id, source })?;

        match row {
            Some(row) => photo_from_row(&row),
            None => Ok(None),
        }
    }

    async fn insert_photo(&self, photo: NewPhoto) -> SqliteResult<PhotoRecord> {
        let user = photo.owner_id;
        let res = sqlx::query("INSERT INTO Photos (url, label, userId) VALUES (?1, ?2, ?3)")
            .bind(&photo.url)
            .bind(&photo.label)
            .bind(user.0)
            .execute(&self.pool)
            .await
            .map_err(|source| SqliteDaoError::InsertPhoto { user, source })?;

        Ok(PhotoRecord {
            id: res.last_insert_rowid(),
            url: photo.url,
            label: photo.label,
            owner_id: user,
        })
    }

    async fn health_check(&self) -> SqliteResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|source| SqliteDaoError::HealthCheck { source })?;
        Ok(())
    }
}

impl PhotoStore for SqlitePhotoStore {
    fn list_photos_for_user(
        &self,
        user: UserId,
    ) -> BoxFuture<'static, StorageResult<Vec<PhotoRecord>>> {
        let store = self.clone();
        Box::pin(async move { store.list_photos_for_user(user).await.map_err(Into::into) })
    }

    fn get_photo_by_id(&self, id: PhotoId) -> BoxFuture<'static, StorageResult<Option<PhotoRecord>>> {
        let store = self.clone();
        Box::pin(async move { store.get_photo_by_id(id).await.map_err(Into::into) })
    }

    fn insert_photo(&self, photo: NewPhoto) -> BoxFuture<'static, StorageResult<PhotoRecord>> {
        let store = self.clone();
        Box::pin(async move { store.insert_photo(photo).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.health_check().await.map_err(Into::into) })
    }
}

/// Map a `Photos` row, skipping orphaned rows that have no owner.
fn photo_from_row(row: &SqliteRow) -> SqliteResult<Option<PhotoRecord>> {
    let decode = |source| SqliteDaoError::DecodeRow { source };

    let Some(owner) = row.try_get::<Option<i64>, _>("userId").map_err(decode)? else {
        return Ok(None);
    };

    Ok(Some(PhotoRecord {
        id: row.try_get::<i64, _>("id").map_err(decode)?,
        url: row
            .try_get::<Option<String>, _>("url")
            .map_err(decode)?
            .unwrap_or_default(),
        label: row
            .try_get::<Option<String>, _>("label")
            .map_err(decode)?
            .unwrap_or_default(),
        owner_id: UserId(owner),
    }))
}
