//! Session collaborators backed by NATS services
//!
//! - Recognition: transcripts from the STT service (`stt.text.>`)
//! - Generation: request/reply against the LLM service (`llm.invoke`)
//! - Narration: request/reply against the TTS service (`tts.speak`)

use super::client::NatsClient;
use super::messages::{GenerationReply, TranscriptMessage};
use crate::error::GenerationError;
use crate::generation::{GenerationOutput, GenerationService};
use crate::session::RecognitionEvent;
use crate::speech::{Narrator, RecognitionBackend, RecognitionSignal};
use anyhow::Result;
use futures::stream::StreamExt;
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Speech recognition fed by the STT service's transcript messages
pub struct NatsRecognitionBackend {
    client: NatsClient,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl NatsRecognitionBackend {
    pub fn new(client: NatsClient) -> Self {
        Self {
            client,
            listener: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl RecognitionBackend for NatsRecognitionBackend {
    async fn start(&self) -> Result<mpsc::Receiver<RecognitionSignal>> {
        let mut subscriber = self.client.subscribe_transcripts().await?;
        let (tx, rx) = mpsc::channel(100);
        let session_id = self.client.session_id().to_string();

        let task = tokio::spawn(async move {
            info!("Transcript listener started");

            while let Some(msg) = subscriber.next().await {
                let transcript = match serde_json::from_slice::<TranscriptMessage>(&msg.payload) {
                    Ok(t) => t,
                    Err(e) => {
                        warn!("Failed to parse transcript message: {}", e);
                        continue;
                    }
                };

                // Filter by session_id
                if transcript.session_id != session_id {
                    continue;
                }

                let event = recognition_event(transcript);
                if tx.send(RecognitionSignal::Event(event)).await.is_err() {
                    break;
                }
            }

            let _ = tx.send(RecognitionSignal::End).await;
            info!("Transcript listener stopped");
        });

        if let Some(previous) = self.listener.lock().await.replace(task) {
            previous.abort();
        }

        Ok(rx)
    }

    async fn stop(&self) -> Result<()> {
        if let Some(task) = self.listener.lock().await.take() {
            task.abort();
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "nats-stt"
    }
}

/// Generation service reached over NATS request/reply
pub struct NatsGenerationService {
    client: NatsClient,
}

impl NatsGenerationService {
    pub fn new(client: NatsClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl GenerationService for NatsGenerationService {
    async fn invoke(
        &self,
        prompt: &str,
        schema: Option<&Value>,
    ) -> Result<GenerationOutput, GenerationError> {
        let reply = self
            .client
            .request_generation(prompt, schema)
            .await
            .map_err(|e| GenerationError::Transport(format!("{:#}", e)))?;

        generation_output(reply)
    }
}

/// Map one STT transcript message onto a single-result recognition event.
///
/// Final segments arrive one sentence at a time, so each gets a trailing
/// space to keep them apart in the committed text.
pub fn recognition_event(transcript: TranscriptMessage) -> RecognitionEvent {
    if transcript.partial {
        RecognitionEvent::single(transcript.text, false)
    } else {
        RecognitionEvent::single(format!("{} ", transcript.text.trim()), true)
    }
}

/// Interpret a generation reply; a reported error wins over any payload
pub fn generation_output(reply: GenerationReply) -> Result<GenerationOutput, GenerationError> {
    match reply {
        GenerationReply {
            error: Some(error), ..
        } => Err(GenerationError::Transport(error)),
        GenerationReply {
            structured: Some(value),
            ..
        } => Ok(GenerationOutput::Structured(value)),
        GenerationReply {
            text: Some(text), ..
        } => Ok(GenerationOutput::Text(text)),
        _ => Err(GenerationError::Malformed("empty generation reply".to_string())),
    }
}

/// Narration through the TTS service
pub struct NatsNarrator {
    client: NatsClient,
}

impl NatsNarrator {
    pub fn new(client: NatsClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Narrator for NatsNarrator {
    async fn speak(&self, text: &str) -> Result<()> {
        self.client.request_speech(text).await
    }

    async fn cancel(&self) -> Result<()> {
        self.client.publish_cancel_speech().await
    }
}
