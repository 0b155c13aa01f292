use super::insights::{compute_insights, InsightsReport};
use crate::error::PersistError;
use crate::session::StoredSession;
use crate::store::{SessionStore, SortOrder};
use chrono::{DateTime, TimeZone};

/// The most recently stored session, for the end-of-session report
pub async fn latest_session(store: &dyn SessionStore) -> Result<Option<StoredSession>, PersistError> {
    let mut sessions = store.list(SortOrder::NewestFirst, Some(1)).await?;
    Ok(sessions.pop())
}

/// Stored sessions, newest first
pub async fn session_history(
    store: &dyn SessionStore,
    limit: Option<usize>,
) -> Result<Vec<StoredSession>, PersistError> {
    store.list(SortOrder::NewestFirst, limit).await
}

/// Load the full history and compute insights as of `now`
pub async fn insights_from_store<Tz: TimeZone>(
    store: &dyn SessionStore,
    now: &DateTime<Tz>,
) -> Result<InsightsReport, PersistError> {
    let sessions = store.list(SortOrder::NewestFirst, None).await?;
    Ok(compute_insights(&sessions, now))
}
