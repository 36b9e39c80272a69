use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping the photo store and report whether the game can currently be played.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let active_sessions = state.sessions().len();

    match state.photo_store().health_check().await {
        Ok(()) => HealthResponse::ok(active_sessions),
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            HealthResponse::degraded(active_sessions)
        }
    }
}
