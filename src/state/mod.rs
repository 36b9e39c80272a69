/// Per-player session registry.
pub mod registry;
/// Quiz flow of a single player.
pub mod session;
/// Phase transitions of a quiz round.
pub mod state_machine;
/// Answer counters and retry queue.
pub mod tracker;

use std::sync::Arc;

use crate::{
    config::AppConfig, dao::photo_store::PhotoStore, services::notifier::AlertNotifier,
};

pub use self::registry::SessionRegistry;
pub use self::state_machine::QuizPhase;

/// Shared handle passed to every handler.
pub type SharedState = Arc<AppState>;

/// Central application state: configuration, storage handle, player sessions and alert sink.
pub struct AppState {
    config: AppConfig,
    photo_store: Arc<dyn PhotoStore>,
    sessions: SessionRegistry,
    notifier: Arc<dyn AlertNotifier>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        config: AppConfig,
        photo_store: Arc<dyn PhotoStore>,
        notifier: Arc<dyn AlertNotifier>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            photo_store,
            sessions: SessionRegistry::new(),
            notifier,
        })
    }

    /// Loaded runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle to the photo store.
    pub fn photo_store(&self) -> Arc<dyn PhotoStore> {
        self.photo_store.clone()
    }

    /// Registry of active player sessions keyed by player identity.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Sink for low-score alerts.
    pub fn notifier(&self) -> Arc<dyn AlertNotifier> {
        self.notifier.clone()
    }
}
