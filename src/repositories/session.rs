use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::models::SessionState;

type Result<T> = std::result::Result<T, RepositoryError>;

/// Default cap on stored sessions
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Default time a session survives without being used
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

#[async_trait]
pub trait SessionRepositoryTrait: Send + Sync {
    /// Returns the state for a live session and marks it as used
    async fn load(&self, id: &Uuid) -> Result<Option<SessionState>>;

    /// Insert or replace the state kept for a session id
    async fn store(&self, id: Uuid, state: SessionState) -> Result<()>;

    async fn remove(&self, id: &Uuid) -> Result<bool>;
}

struct Entry {
    state: SessionState,
    last_seen: Instant,
}

/// In-memory session store.
///
/// Sessions idle for longer than `idle_timeout` are dropped. When more than
/// `max_sessions` are held, expired entries are swept first and then the
/// least recently used ones are evicted.
pub struct SessionRepository {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl Default for SessionRepository {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS, DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionRepository {
    pub fn new(max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            idle_timeout,
        }
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    fn evict(&self, sessions: &mut HashMap<Uuid, Entry>) {
        let idle_timeout = self.idle_timeout;
        sessions.retain(|_, entry| entry.last_seen.elapsed() < idle_timeout);

        while sessions.len() > self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    debug!("Evicted session {}", id);
                }
                None => break,
            }
        }
    }
}

#[async_trait]
impl SessionRepositoryTrait for SessionRepository {
    async fn load(&self, id: &Uuid) -> Result<Option<SessionState>> {
        let mut sessions = self.sessions.write();

        let expired = match sessions.get_mut(id) {
            Some(entry) if entry.last_seen.elapsed() < self.idle_timeout => {
                entry.last_seen = Instant::now();
                return Ok(Some(entry.state.clone()));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            sessions.remove(id);
            debug!("Session {} expired", id);
        }
        Ok(None)
    }

    async fn store(&self, id: Uuid, state: SessionState) -> Result<()> {
        let mut sessions = self.sessions.write();
        sessions.insert(
            id,
            Entry {
                state,
                last_seen: Instant::now(),
            },
        );

        if sessions.len() > self.max_sessions {
            self.evict(&mut sessions);
        }
        Ok(())
    }

    async fn remove(&self, id: &Uuid) -> Result<bool> {
        Ok(self.sessions.write().remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlashKind;

    fn flashed(message: &str) -> SessionState {
        let mut state = SessionState::default();
        state.push_flash(FlashKind::Success, message);
        state
    }

    #[tokio::test]
    async fn test_store_load_remove() {
        let repo = SessionRepository::default();
        let id = Uuid::new_v4();
        assert!(repo.load(&id).await.unwrap().is_none());

        let state = flashed("hello");
        repo.store(id, state.clone()).await.unwrap();
        assert_eq!(repo.load(&id).await.unwrap(), Some(state));

        assert!(repo.remove(&id).await.unwrap());
        assert!(!repo.remove(&id).await.unwrap());
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let repo = SessionRepository::new(3, DEFAULT_IDLE_TIMEOUT);
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            repo.store(*id, flashed("hi")).await.unwrap();
            std::thread::sleep(Duration::from_millis(2));
        }

        // Touch the oldest so the second one becomes the eviction candidate
        assert!(repo.load(&ids[0]).await.unwrap().is_some());
        std::thread::sleep(Duration::from_millis(2));

        repo.store(Uuid::new_v4(), flashed("new")).await.unwrap();
        assert_eq!(repo.count(), 3);
        assert!(repo.load(&ids[0]).await.unwrap().is_some());
        assert!(repo.load(&ids[1]).await.unwrap().is_none());
        assert!(repo.load(&ids[2]).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let repo = SessionRepository::new(DEFAULT_MAX_SESSIONS, Duration::from_millis(10));
        let id = Uuid::new_v4();
        repo.store(id, flashed("hi")).await.unwrap();

        std::thread::sleep(Duration::from_millis(20));
        assert!(repo.load(&id).await.unwrap().is_none());
        assert_eq!(repo.count(), 0);
    }
}
