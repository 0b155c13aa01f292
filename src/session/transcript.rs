use serde::{Deserialize, Serialize};

/// One result inside a recognition event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub transcript: String,
    pub is_final: bool,
}

/// A batch of recognition results delivered by the capture stream.
///
/// `results` is the stream's cumulative result list; `result_index` is the
/// first entry that changed since the previous event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionEvent {
    #[serde(default)]
    pub result_index: usize,
    pub results: Vec<RecognitionResult>,
}

impl RecognitionEvent {
    /// Single-result event, as produced by segment-oriented STT services
    pub fn single(transcript: impl Into<String>, is_final: bool) -> Self {
        Self {
            result_index: 0,
            results: vec![RecognitionResult {
                transcript: transcript.into(),
                is_final,
            }],
        }
    }
}

/// Text being composed from typed and spoken input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptBuffer {
    /// Value offered to the input control; becomes the next user turn
    pub committed_text: String,
    /// Unresolved speech, for display only
    pub interim_text: String,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the committed text with manually typed input
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.committed_text = text.into();
    }

    /// Merge one recognition event into the buffer
    pub fn apply(&mut self, event: &RecognitionEvent) {
        let mut final_text = String::new();
        let mut interim_text = String::new();

        for result in event.results.iter().skip(event.result_index) {
            if result.is_final {
                final_text.push_str(&result.transcript);
            } else {
                interim_text.push_str(&result.transcript);
            }
        }

        self.interim_text = interim_text;
        if !final_text.is_empty() {
            self.committed_text.push_str(&final_text);
            self.interim_text.clear();
        }
    }

    pub fn clear_interim(&mut self) {
        self.interim_text.clear();
    }

    /// Take the committed text for submission, leaving the buffer empty
    pub fn take(&mut self) -> String {
        self.interim_text.clear();
        std::mem::take(&mut self.committed_text)
    }
}
