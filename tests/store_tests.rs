// Session store tests
//
// The JSON store writes into a temporary directory per test.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use dilse::session::{Activity, Channel, Mood, SessionMode, SessionRecord, Speaker, Turn};
use dilse::store::{JsonFileSessionStore, MemorySessionStore, SessionStore, SortOrder};
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

fn record(summary: &str) -> SessionRecord {
    let started = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
    SessionRecord {
        session_id: Uuid::new_v4(),
        mode: SessionMode::Guided,
        channel: Channel::Voice,
        started_at: started,
        ended_at: started + chrono::Duration::minutes(3),
        duration_minutes: Some(3),
        turns: vec![Turn {
            sequence: 1,
            speaker: Speaker::User,
            text: "hello".to_string(),
            created_at: started,
        }],
        transcript: "User: hello".to_string(),
        summary: Some(summary.to_string()),
        topics: vec!["sleep".to_string()],
        mood_after: Some(Mood::Neutral),
        recommended_activities: vec![Activity {
            title: "Walk".to_string(),
            description: "Ten minutes outside".to_string(),
        }],
    }
}

async fn store_three(store: &dyn SessionStore) -> Result<()> {
    for summary in ["first", "second", "third"] {
        store.create(record(summary)).await?;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    Ok(())
}

fn summaries(sessions: &[dilse::session::StoredSession]) -> Vec<String> {
    sessions
        .iter()
        .filter_map(|s| s.record.summary.clone())
        .collect()
}

#[tokio::test]
async fn test_json_store_round_trips_a_record() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileSessionStore::open(dir.path()).await?;

    let original = record("talked about sleep");
    let stored = store.create(original.clone()).await?;
    assert_eq!(stored.record, original);

    let listed = store.list(SortOrder::NewestFirst, None).await?;
    assert_eq!(listed, vec![stored]);

    Ok(())
}

#[tokio::test]
async fn test_json_store_orders_and_limits() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileSessionStore::open(dir.path().join("nested/sessions")).await?;
    store_three(&store).await?;

    let newest = store.list(SortOrder::NewestFirst, None).await?;
    assert_eq!(summaries(&newest), vec!["third", "second", "first"]);

    let oldest = store.list(SortOrder::OldestFirst, Some(2)).await?;
    assert_eq!(summaries(&oldest), vec!["first", "second"]);

    Ok(())
}

#[tokio::test]
async fn test_json_store_uses_wire_field_names() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileSessionStore::open(dir.path()).await?;
    store.create(record("fields")).await?;

    let mut entries = std::fs::read_dir(dir.path())?;
    let path = entries.next().expect("one session file")?.path();
    let json: serde_json::Value = serde_json::from_slice(&std::fs::read(path)?)?;

    assert!(json.get("created_date").is_some());
    assert_eq!(json["session_type"], "guided");
    assert_eq!(json["mode"], "voice");
    assert_eq!(json["key_topics"][0], "sleep");
    assert_eq!(json["mood_after"], "neutral");
    assert_eq!(json["duration_minutes"], 3);

    Ok(())
}

#[tokio::test]
async fn test_json_store_skips_unreadable_files() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileSessionStore::open(dir.path()).await?;
    store.create(record("good")).await?;

    std::fs::write(dir.path().join("broken.json"), b"{ not json")?;
    std::fs::write(dir.path().join("notes.txt"), b"ignored")?;

    let listed = store.list(SortOrder::NewestFirst, None).await?;
    assert_eq!(summaries(&listed), vec!["good"]);

    Ok(())
}

#[tokio::test]
async fn test_json_store_reads_minimal_records() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileSessionStore::open(dir.path()).await?;

    // Older records carry no turns, summary or mood
    let json = serde_json::json!({
        "id": Uuid::new_v4(),
        "created_date": "2025-03-01T10:00:00Z",
        "session_id": Uuid::new_v4(),
        "session_type": "classic",
        "mode": "text",
        "started_at": "2025-03-01T09:50:00Z",
        "ended_at": "2025-03-01T10:00:00Z"
    });
    std::fs::write(dir.path().join("legacy.json"), serde_json::to_vec(&json)?)?;

    let listed = store.list(SortOrder::NewestFirst, None).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].record.mode, SessionMode::Freeform);
    assert!(listed[0].record.mood_after.is_none());
    assert!(listed[0].record.duration_minutes.is_none());

    Ok(())
}

#[tokio::test]
async fn test_json_store_keeps_records_with_unknown_mood() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileSessionStore::open(dir.path()).await?;

    let json = serde_json::json!({
        "id": Uuid::new_v4(),
        "created_date": "2025-03-15T10:00:00Z",
        "session_id": Uuid::new_v4(),
        "session_type": "freeform",
        "mode": "text",
        "started_at": "2025-03-15T09:50:00Z",
        "ended_at": "2025-03-15T10:00:00Z",
        "duration_minutes": 10,
        "key_topics": ["sleep"],
        "mood_after": "anxious"
    });
    std::fs::write(dir.path().join("anxious.json"), serde_json::to_vec(&json)?)?;

    let listed = store.list(SortOrder::NewestFirst, None).await?;
    assert_eq!(listed.len(), 1);
    assert!(listed[0].record.mood_after.is_none());
    assert_eq!(listed[0].record.duration_minutes, Some(10));
    assert_eq!(listed[0].record.topics, vec!["sleep"]);

    let report = dilse::analytics::compute_insights(
        &listed,
        &Utc.with_ymd_and_hms(2025, 3, 15, 18, 0, 0).unwrap(),
    );
    assert_eq!(report.total_sessions, 1);
    assert_eq!(report.total_minutes, 10);
    assert_eq!(report.daily.last().and_then(|d| d.mood_score), Some(3));
    assert!(report.mood_distribution.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_memory_store_orders_and_limits() -> Result<()> {
    let store = MemorySessionStore::new();
    store_three(&store).await?;

    assert_eq!(store.len().await, 3);

    let newest = store.list(SortOrder::NewestFirst, Some(1)).await?;
    assert_eq!(summaries(&newest), vec!["third"]);

    let oldest = store.list(SortOrder::OldestFirst, None).await?;
    assert_eq!(summaries(&oldest), vec!["first", "second", "third"]);

    Ok(())
}
