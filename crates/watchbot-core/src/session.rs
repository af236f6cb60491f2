use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use watchbot_models::ConversationState;

/// Per-user conversation state, keyed by chat id.
pub trait SessionStore: Send + Sync {
    fn get(&self, user_id: i64) -> Option<ConversationState>;

    /// Replace any previous state for this user.
    fn set(&self, user_id: i64, state: ConversationState);

    fn clear(&self, user_id: i64);
}

/// Process-local sessions. Nothing survives a restart and nothing expires.
#[derive(Default)]
pub struct InMemorySessionStore {
    states: Mutex<HashMap<i64, ConversationState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-written
    fn lock(&self) -> MutexGuard<'_, HashMap<i64, ConversationState>> {
        self.states.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, user_id: i64) -> Option<ConversationState> {
        self.lock().get(&user_id).cloned()
    }

    fn set(&self, user_id: i64, state: ConversationState) {
        self.lock().insert(user_id, state);
    }

    fn clear(&self, user_id: i64) {
        self.lock().remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchbot_models::{MediaKind, PendingEntry};

    fn awaiting(title: &str, catalog_id: i64) -> ConversationState {
        ConversationState::AwaitingEpisode(PendingEntry {
            catalog_id,
            title: title.to_string(),
            kind: MediaKind::Show,
        })
    }

    #[test]
    fn test_set_get_clear() {
        let store = InMemorySessionStore::new();
        assert!(store.get(1).is_none());

        store.set(1, awaiting("Dark", 70523));
        assert_eq!(store.get(1), Some(awaiting("Dark", 70523)));
        assert!(store.get(2).is_none());

        store.clear(1);
        assert!(store.get(1).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let store = InMemorySessionStore::new();
        store.set(1, awaiting("Dark", 70523));
        store.set(1, awaiting("Lost", 4607));
        assert_eq!(store.get(1), Some(awaiting("Lost", 4607)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_unknown_user_is_noop() {
        let store = InMemorySessionStore::new();
        store.set(1, awaiting("Dark", 70523));
        store.clear(2);
        assert_eq!(store.len(), 1);
    }
}
