use std::time::Duration;

use dashmap::DashMap;
use tracing::debug;

use crate::{dao::models::UserId, state::session::GameSession};

/// One [`GameSession`] per authenticated player.
///
/// Closures passed to [`SessionRegistry::with_session`] run while the map
/// shard is locked, so they must stay synchronous and short.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<UserId, GameSession>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` on the player's session, creating it on first use.
    pub fn with_session<R>(&self, player: UserId, f: impl FnOnce(&mut GameSession) -> R) -> R {
        let mut entry = self.sessions.entry(player).or_insert_with(|| {
            let session = GameSession::new(player);
            debug!(player = %player, session_id = %session.id, "created game session");
            session
        });
        entry.touch();
        f(entry.value_mut())
    }

    /// Read the player's session without creating one.
    pub fn peek<R>(&self, player: UserId, f: impl FnOnce(&GameSession) -> R) -> Option<R> {
        self.sessions.get(&player).map(|session| f(session.value()))
    }

    /// Dispose of the player's session. Returns whether one existed.
    pub fn remove(&self, player: UserId) -> bool {
        self.sessions.remove(&player).is_some()
    }

    /// Drop every session idle for at least `ttl`, returning how many were removed.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.idle_for() < ttl);
        before.saturating_sub(self.sessions.len())
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no player has a session.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_isolated_per_player() {
        let registry = SessionRegistry::new();
        let alice = UserId(1);
        let bob = UserId(2);

        let alice_id = registry.with_session(alice, |session| session.id);
        let bob_id = registry.with_session(bob, |session| session.id);
        assert_ne!(alice_id, bob_id);
        assert_eq!(registry.with_session(alice, |session| session.id), alice_id);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn peek_does_not_create_sessions() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.peek(UserId(3), |session| session.round), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_disposes_the_session() {
        let registry = SessionRegistry::new();
        registry.with_session(UserId(4), |_| ());
        assert!(registry.remove(UserId(4)));
        assert!(!registry.remove(UserId(4)));
    }

    #[test]
    fn evict_idle_only_drops_stale_sessions() {
        let registry = SessionRegistry::new();
        registry.with_session(UserId(5), |_| ());

        assert_eq!(registry.evict_idle(Duration::from_secs(3600)), 0);
        assert_eq!(registry.evict_idle(Duration::ZERO), 1);
        assert!(registry.is_empty());
    }
}
