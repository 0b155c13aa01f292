use super::messages::{CancelSpeech, GenerationReply, GenerationRequest, SpeakRequest};
use anyhow::{Context, Result};
use async_nats::{Client, Request};
use serde_json::Value;
use tracing::info;

/// Subject the STT service publishes partial and final transcripts on
pub const TRANSCRIPT_SUBJECT: &str = "stt.text.>";
pub const GENERATION_SUBJECT: &str = "llm.invoke";
pub const SPEAK_SUBJECT: &str = "tts.speak";
pub const CANCEL_SPEECH_SUBJECT: &str = "tts.cancel";

#[derive(Clone)]
pub struct NatsClient {
    client: Client,
    session_id: String,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, session_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client, session_id })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Subscribe to transcript messages
    pub async fn subscribe_transcripts(&self) -> Result<async_nats::Subscriber> {
        // Partial and final transcripts arrive on stt.text.partial / stt.text.final;
        // callers filter by session_id in the payload
        info!("Subscribing to transcripts on {}", TRANSCRIPT_SUBJECT);

        let subscriber = self
            .client
            .subscribe(TRANSCRIPT_SUBJECT.to_string())
            .await
            .context("Failed to subscribe to transcripts")?;

        info!("Subscribed to {}", TRANSCRIPT_SUBJECT);

        Ok(subscriber)
    }

    /// Ask the LLM service for a response and wait for its reply
    pub async fn request_generation(
        &self,
        prompt: &str,
        schema: Option<&Value>,
    ) -> Result<GenerationReply> {
        let request = GenerationRequest {
            session_id: self.session_id.clone(),
            prompt: prompt.to_string(),
            response_json_schema: schema.cloned(),
        };
        let payload = serde_json::to_vec(&request)?;

        let message = self
            .client
            .send_request(GENERATION_SUBJECT.to_string(), untimed_request(payload))
            .await
            .context("Generation request failed")?;

        info!(
            "Generation reply received (prompt={} chars, structured={})",
            prompt.len(),
            schema.is_some()
        );

        serde_json::from_slice(&message.payload).context("Failed to parse generation reply")
    }

    /// Ask the TTS service to narrate `text`; resolves when narration ends
    pub async fn request_speech(&self, text: &str) -> Result<()> {
        let request = SpeakRequest {
            session_id: self.session_id.clone(),
            text: text.to_string(),
            rate: 0.9,
            pitch: 1.0,
        };
        let payload = serde_json::to_vec(&request)?;

        self.client
            .send_request(SPEAK_SUBJECT.to_string(), untimed_request(payload))
            .await
            .context("Speech request failed")?;

        Ok(())
    }

    /// Tell the TTS service to stop narrating for this session
    pub async fn publish_cancel_speech(&self) -> Result<()> {
        let payload = serde_json::to_vec(&CancelSpeech {
            session_id: self.session_id.clone(),
        })?;

        self.client
            .publish(CANCEL_SPEECH_SUBJECT.to_string(), payload.into())
            .await
            .context("Failed to publish speech cancel")?;

        Ok(())
    }
}

/// Request without a client-side timeout; generation and narration can run
/// well past the connection's default
fn untimed_request(payload: Vec<u8>) -> Request {
    Request::new().payload(payload.into()).timeout(None)
}
