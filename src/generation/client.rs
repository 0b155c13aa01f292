use super::schema::{summary_schema, SessionAssessment};
use crate::error::GenerationError;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// What the generation service produced for one call
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    Text(String),
    Structured(Value),
}

/// Language generation service contract
///
/// Implementations:
/// - NATS request/reply (`crate::nats::NatsGenerationService`)
/// - Scripted fakes in tests
#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate a response to `prompt`, constrained to `schema` when given
    async fn invoke(
        &self,
        prompt: &str,
        schema: Option<&Value>,
    ) -> Result<GenerationOutput, GenerationError>;
}

/// Client used by the engine for per-turn replies and end-of-session summaries
#[derive(Clone)]
pub struct ResponseGenerator {
    service: Arc<dyn GenerationService>,
}

impl ResponseGenerator {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    /// Free-text reply for one dialogue turn
    pub async fn reply(&self, prompt: &str) -> Result<String, GenerationError> {
        let text = match self.service.invoke(prompt, None).await? {
            GenerationOutput::Text(text) => text,
            GenerationOutput::Structured(Value::String(text)) => text,
            GenerationOutput::Structured(other) => {
                return Err(GenerationError::Malformed(format!(
                    "expected text reply, got {}",
                    other
                )))
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::Malformed("empty reply".to_string()));
        }

        debug!("Generated reply ({} chars)", text.len());
        Ok(text.to_string())
    }

    /// Schema-constrained assessment of a whole session transcript
    pub async fn summarize(&self, transcript: &str) -> Result<SessionAssessment, GenerationError> {
        let prompt = summary_prompt(transcript);
        let schema = summary_schema();

        let value = match self.service.invoke(&prompt, Some(&schema)).await? {
            GenerationOutput::Structured(value) => value,
            GenerationOutput::Text(text) => serde_json::from_str(&text).map_err(|e| {
                warn!("Summary output is not JSON: {}", e);
                GenerationError::Malformed(e.to_string())
            })?,
        };

        serde_json::from_value(value).map_err(|e| {
            warn!("Summary output violates schema: {}", e);
            GenerationError::SchemaViolation(e.to_string())
        })
    }
}

fn summary_prompt(transcript: &str) -> String {
    format!(
        "Analyze this support session and provide a brief summary and mood assessment.\n\
         \n\
         Session:\n\
         {transcript}\n\
         \n\
         Respond with JSON containing:\n\
         - summary: brief session summary (2-3 sentences)\n\
         - key_topics: array of the main topics discussed\n\
         - mood_assessment: the user's estimated mood after the session \
         (very_sad, sad, neutral, happy, very_happy)\n\
         - recommended_activities: array of 3 mood-boosting activities, each with \
         activity and description"
    )
}
