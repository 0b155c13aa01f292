//! Session persistence
//!
//! Finalized sessions are handed to a `SessionStore` exactly once. The store
//! assigns the record id and creation time and lists records for history and
//! analytics.

mod file;
mod memory;

pub use file::JsonFileSessionStore;
pub use memory::MemorySessionStore;

use crate::error::PersistError;
use crate::session::{SessionRecord, StoredSession};

/// Listing order by creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// `-created_date`
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Session persistence collaborator
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a finalized session
    async fn create(&self, record: SessionRecord) -> Result<StoredSession, PersistError>;

    /// List stored sessions in `order`, truncated to `limit` when given
    async fn list(
        &self,
        order: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<StoredSession>, PersistError>;
}

fn sort_and_limit(sessions: &mut Vec<StoredSession>, order: SortOrder, limit: Option<usize>) {
    match order {
        SortOrder::NewestFirst => sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::OldestFirst => sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
    if let Some(limit) = limit {
        sessions.truncate(limit);
    }
}
