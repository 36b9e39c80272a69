/// Database model definitions.
pub mod models;
/// Photo persistence backends.
pub mod photo_store;
/// Storage abstraction layer for database operations.
pub mod storage;
