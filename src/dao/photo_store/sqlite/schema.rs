use sqlx::SqlitePool;

use super::error::{SqliteDaoError, SqliteResult};

/// Create the `Photos` table and its owner index when they are missing.
///
/// The table layout (including the `userId` column name) is shared with the
/// upload service, so it must not be renamed here.
pub async fn ensure_schema(pool: &SqlitePool) -> SqliteResult<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS Photos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT,
            label TEXT,
            userId INTEGER
        );
        ",
    )
    .execute(pool)
    .await
    .map_err(|source| SqliteDaoError::Schema { source })?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_photos_user_id ON Photos (userId);")
        .execute(pool)
        .await
        .map_err(|source| SqliteDaoError::Schema { source })?;

    Ok(())
}
