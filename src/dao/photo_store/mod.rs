/// SQLite implementation of [`PhotoStore`].
pub mod sqlite;

use futures::future::BoxFuture;

use crate::dao::{
    models::{NewPhoto, PhotoId, PhotoRecord, UserId},
    storage::StorageResult,
};

/// Abstraction over the persistence layer holding the players' photos.
///
/// The game only reads from the store; `insert_photo` exists for seeding and
/// tests since uploads are handled by a separate service.
pub trait PhotoStore: Send + Sync {
    /// Every photo owned by `user`, oldest first.
    fn list_photos_for_user(&self, user: UserId) -> BoxFuture<'static, StorageResult<Vec<PhotoRecord>>>;
    /// Photo with the given id, or `None` when it does not exist.
    fn get_photo_by_id(&self, id: PhotoId) -> BoxFuture<'static, StorageResult<Option<PhotoRecord>>>;
    /// Store a new photo and return it with its allocated id.
    fn insert_photo(&self, photo: NewPhoto) -> BoxFuture<'static, StorageResult<PhotoRecord>>;
    /// Cheap round-trip proving the backend answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
