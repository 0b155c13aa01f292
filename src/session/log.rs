use super::model::{Speaker, Turn};
use chrono::{DateTime, Utc};

/// Append-only, ordered history of the turns in one session
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    turns: Vec<Turn>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn, assigning the next sequence number
    pub fn append(&mut self, speaker: Speaker, text: impl Into<String>, at: DateTime<Utc>) -> &Turn {
        let sequence = self.turns.len() as u64 + 1;
        self.turns.push(Turn {
            sequence,
            speaker,
            text: text.into(),
            created_at: at,
        });
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent `n` turns (all of them when fewer exist), oldest first
    pub fn last(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render as `Speaker: text` lines in chronological order
    pub fn render_transcript(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.speaker.transcript_label(), t.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
