use super::{sort_and_limit, SessionStore, SortOrder};
use crate::error::PersistError;
use crate::session::{SessionRecord, StoredSession};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

/// Stores each session as `<created>-<id>.json` inside one directory
pub struct JsonFileSessionStore {
    dir: PathBuf,
}

impl JsonFileSessionStore {
    /// Open the store, creating the directory if it doesn't exist
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, PersistError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;

        info!("Session store opened at {}", dir.display());

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait::async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn create(&self, record: SessionRecord) -> Result<StoredSession, PersistError> {
        let stored = StoredSession {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            record,
        };

        let file_name = format!(
            "{}-{}.json",
            stored.created_at.format("%Y%m%dT%H%M%S%3f"),
            stored.id
        );
        let path = self.dir.join(file_name);
        let tmp_path = path.with_extension("json.tmp");

        // Write then rename so a failed write never leaves a partial record
        let payload = serde_json::to_vec_pretty(&stored)?;
        fs::write(&tmp_path, payload).await?;
        fs::rename(&tmp_path, &path).await?;

        info!("Stored session {} at {}", stored.id, path.display());

        Ok(stored)
    }

    async fn list(
        &self,
        order: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<StoredSession>, PersistError> {
        let mut sessions = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let bytes = fs::read(&path).await?;
            match serde_json::from_slice::<StoredSession>(&bytes) {
                Ok(session) => sessions.push(session),
                Err(e) => warn!("Skipping unreadable session file {}: {}", path.display(), e),
            }
        }

        sort_and_limit(&mut sessions, order, limit);
        Ok(sessions)
    }
}
