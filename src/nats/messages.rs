use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transcript message received from the STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub session_id: String,
    pub text: String,
    pub partial: bool,
    pub timestamp: String,  // RFC3339 timestamp
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Generation request sent to the LLM service
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub session_id: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_json_schema: Option<Value>,
}

/// Generation reply from the LLM service; exactly one field is expected
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationReply {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub structured: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Narration request sent to the TTS service
#[derive(Debug, Serialize, Deserialize)]
pub struct SpeakRequest {
    pub session_id: String,
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
}

/// Narration cancel notice sent to the TTS service
#[derive(Debug, Serialize, Deserialize)]
pub struct CancelSpeech {
    pub session_id: String,
}
