use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::PhotoId;

/// Form posted by the "Select" button of a choice.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CheckForm {
    /// Identifier of the picture the player picked.
    #[validate(range(min = 1))]
    pub guess: PhotoId,
}
