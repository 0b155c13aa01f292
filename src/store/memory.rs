use super::{sort_and_limit, SessionStore, SortOrder};
use crate::error::PersistError;
use crate::session::{SessionRecord, StoredSession};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Volatile store, for tests and servers run without a sessions directory
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<Vec<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with already stored sessions
    pub fn with_sessions(sessions: Vec<StoredSession>) -> Self {
        Self {
            sessions: RwLock::new(sessions),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, record: SessionRecord) -> Result<StoredSession, PersistError> {
        let stored = StoredSession {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            record,
        };

        self.sessions.write().await.push(stored.clone());
        info!("Stored session {} in memory", stored.id);

        Ok(stored)
    }

    async fn list(
        &self,
        order: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<StoredSession>, PersistError> {
        let mut sessions = self.sessions.read().await.clone();
        sort_and_limit(&mut sessions, order, limit);
        Ok(sessions)
    }
}
