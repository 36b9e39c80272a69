use tokio::time::sleep;
use tracing::info;

use crate::state::SharedState;

/// Periodically drop sessions whose players stopped playing.
pub async fn run(state: SharedState) {
    let ttl = state.config().sessions.idle_timeout();
    let interval = state.config().sessions.sweep_interval();

    loop {
        sleep(interval).await;

        let evicted = state.sessions().evict_idle(ttl);
        if evicted > 0 {
            info!(
                evicted,
                remaining = state.sessions().len(),
                "evicted idle game sessions"
            );
        }
    }
}
