use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary key of a row in the `Photos` table.
pub type PhotoId = i64;

/// Identity of an authenticated player, as provided by the sign-in layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Labeled picture uploaded by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Row identifier, allocated by the database.
    pub id: PhotoId,
    /// Location of the image (absolute URL or server-relative path).
    pub url: String,
    /// Name of the person shown on the picture.
    pub label: String,
    /// Player the photo belongs to.
    pub owner_id: UserId,
}

/// Photo about to be inserted; the database allocates the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    /// Location of the image.
    pub url: String,
    /// Name of the person shown on the picture.
    pub label: String,
    /// Player the photo will belong to.
    pub owner_id: UserId,
}

impl NewPhoto {
    /// Describe a photo owned by `owner_id`.
    pub fn new(url: impl Into<String>, label: impl Into<String>, owner_id: UserId) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
            owner_id,
        }
    }
}
