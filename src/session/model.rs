use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Label used when rendering the context window for the generation service
    pub fn context_label(self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Assistant => "Therapist",
        }
    }

    /// Label used in the flat transcript stored with a finalized session
    pub fn transcript_label(self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Assistant => "AI",
        }
    }
}

/// One dialogue utterance. Immutable once appended to the message log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Position in the session, assigned by the log (starts at 1, gapless)
    pub sequence: u64,
    pub speaker: Speaker,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Conversation style requested when the session was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Unstructured supportive conversation
    #[default]
    #[serde(alias = "classic")]
    Freeform,
    /// Structured session led by the assistant
    Guided,
}

/// How the user is talking to the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    #[default]
    Text,
    Voice,
}

/// Mood classification shared by the finalizer and the analytics aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    VerySad,
    Sad,
    Neutral,
    Happy,
    VeryHappy,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::VerySad,
        Mood::Sad,
        Mood::Neutral,
        Mood::Happy,
        Mood::VeryHappy,
    ];

    /// Score on the 1 (very sad) to 5 (very happy) scale
    pub fn score(self) -> u8 {
        match self {
            Mood::VerySad => 1,
            Mood::Sad => 2,
            Mood::Neutral => 3,
            Mood::Happy => 4,
            Mood::VeryHappy => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::VerySad => "very_sad",
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
            Mood::Happy => "happy",
            Mood::VeryHappy => "very_happy",
        }
    }

    /// Parse a stored mood label; `None` when the label is not one of ours
    pub fn from_label(label: &str) -> Option<Mood> {
        let normalized = label.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Mood::ALL.into_iter().find(|m| m.label() == normalized)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Mood::VerySad => "Very Sad",
            Mood::Sad => "Sad",
            Mood::Neutral => "Neutral",
            Mood::Happy => "Happy",
            Mood::VeryHappy => "Very Happy",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A follow-up activity suggested at the end of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(alias = "activity")]
    pub title: String,
    pub description: String,
}

/// A finalized session, as handed to the persistence collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: Uuid,

    #[serde(rename = "session_type")]
    pub mode: SessionMode,

    #[serde(rename = "mode")]
    pub channel: Channel,

    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,

    #[serde(default)]
    pub duration_minutes: Option<i64>,

    #[serde(default)]
    pub turns: Vec<Turn>,

    /// Flat `Speaker: text` rendering of the turns
    #[serde(default)]
    pub transcript: String,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(rename = "key_topics", default)]
    pub topics: Vec<String>,

    /// Unknown labels in stored records read as no mood
    #[serde(default, deserialize_with = "lenient_mood")]
    pub mood_after: Option<Mood>,

    #[serde(default)]
    pub recommended_activities: Vec<Activity>,
}

/// A session record as returned by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: Uuid,

    /// Assigned by the store; analytics bucket sessions by this instant
    #[serde(rename = "created_date")]
    pub created_at: DateTime<Utc>,

    #[serde(flatten)]
    pub record: SessionRecord,
}

fn lenient_mood<'de, D>(deserializer: D) -> Result<Option<Mood>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(label)) => Mood::from_label(&label),
        _ => None,
    })
}
