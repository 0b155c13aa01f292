use super::engine::SessionState;
use super::model::{Channel, SessionMode, StoredSession, Turn};
use super::transcript::TranscriptBuffer;
use crate::speech::{CaptureState, PlaybackState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Point-in-time view of a live session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,

    pub state: SessionState,

    pub mode: SessionMode,

    pub channel: Channel,

    /// When the first user turn arrived
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds elapsed since `started_at`
    pub duration_secs: f64,

    pub turns: Vec<Turn>,

    /// Input being composed (typed or spoken)
    pub transcript: TranscriptBuffer,

    pub capture: CaptureState,

    pub playback: PlaybackState,

    /// Whether a reply is being generated right now
    pub turn_in_flight: bool,

    /// The persisted record once the session is completed
    pub completed: Option<StoredSession>,
}
