use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::{
    dao::storage::StorageError,
    dto::page::{Link, message_page},
    state::session::SessionError,
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// The player does not own enough photos to play.
    #[error("at least {required} photos are required, found {available}")]
    InsufficientPhotos {
        /// Photos needed for one question.
        required: usize,
        /// Photos the player owns.
        available: usize,
    },
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<SessionError> for ServiceError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InsufficientData(data) => ServiceError::InsufficientPhotos {
                required: data.required,
                available: data.available,
            },
            SessionError::NoPendingQuestion => {
                ServiceError::InvalidState("no question is waiting for an answer".into())
            }
            SessionError::InvalidTransition(invalid) => {
                ServiceError::InvalidState(invalid.to_string())
            }
            SessionError::Score(undefined) => ServiceError::InvalidState(undefined.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTML responses.
///
/// Every variant renders as a readable message plus a link back into the game.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Player must act outside the game first (e.g. upload photos).
    #[error("guidance: {0}")]
    Guidance(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => {
                AppError::ServiceUnavailable(format!("Error retrieving photos: {source}"))
            }
            ServiceError::InsufficientPhotos { required, .. } => AppError::Guidance(format!(
                "Please upload at least {required} photos to start the game."
            )),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Guidance(_) => StatusCode::OK,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest(message)
            | AppError::NotFound(message)
            | AppError::Conflict(message)
            | AppError::Guidance(message)
            | AppError::ServiceUnavailable(message) => message,
        }
    }

    fn recovery_link(&self) -> Link {
        match self {
            AppError::NotFound(_) | AppError::ServiceUnavailable(_) => Link::new("/game", "Try again"),
            AppError::Guidance(_) => Link::new("/game", "Check again"),
            AppError::BadRequest(_) | AppError::Conflict(_) => {
                Link::new("/game", "Back to the game")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else if status.is_client_error() {
            warn!(error = %self, "request rejected");
        }

        let page = message_page(self.message(), &self.recovery_link());
        (status, Html(page)).into_response()
    }
}
