use super::log::MessageLog;
use super::model::{Channel, SessionMode, SessionRecord, StoredSession};
use crate::error::SessionError;
use crate::generation::ResponseGenerator;
use crate::store::SessionStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Everything the finalizer needs, captured when the session left `Active`
#[derive(Debug, Clone)]
pub struct SessionDraft {
    pub session_id: Uuid,
    pub mode: SessionMode,
    pub channel: Channel,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub log: MessageLog,
}

/// Summarizes and persists a session; all-or-nothing
#[derive(Clone)]
pub struct SessionFinalizer {
    generator: ResponseGenerator,
    store: Arc<dyn SessionStore>,
}

impl SessionFinalizer {
    pub fn new(generator: ResponseGenerator, store: Arc<dyn SessionStore>) -> Self {
        Self { generator, store }
    }

    /// Whole minutes between `started_at` and `ended_at`, rounded to nearest
    pub fn duration_minutes(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> i64 {
        let millis = ended_at.signed_duration_since(started_at).num_milliseconds();
        (millis as f64 / 60_000.0).round() as i64
    }

    /// Summarize `draft` and persist it.
    ///
    /// Nothing is written unless the summary is valid; a persistence failure
    /// leaves nothing behind either.
    pub async fn finalize(&self, draft: SessionDraft) -> Result<StoredSession, SessionError> {
        let duration = Self::duration_minutes(draft.started_at, draft.ended_at);
        let transcript = draft.log.render_transcript();

        info!(
            "Finalizing session {} ({} turns, {} min)",
            draft.session_id,
            draft.log.len(),
            duration
        );

        let assessment = self.generator.summarize(&transcript).await.map_err(|e| {
            error!("Session summary failed: {}", e);
            SessionError::Finalization(format!("summary failed: {}", e))
        })?;

        let record = SessionRecord {
            session_id: draft.session_id,
            mode: draft.mode,
            channel: draft.channel,
            started_at: draft.started_at,
            ended_at: draft.ended_at,
            duration_minutes: Some(duration),
            turns: draft.log.turns().to_vec(),
            transcript,
            summary: Some(assessment.summary),
            topics: assessment.key_topics,
            mood_after: Some(assessment.mood_assessment),
            recommended_activities: assessment
                .recommended_activities
                .into_iter()
                .map(Into::into)
                .collect(),
        };

        let stored = self.store.create(record).await.map_err(|e| {
            error!("Failed to persist session {}: {}", draft.session_id, e);
            SessionError::from(e)
        })?;

        info!("Session {} stored as {}", draft.session_id, stored.id);

        Ok(stored)
    }
}
