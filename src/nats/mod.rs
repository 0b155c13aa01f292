pub mod backends;
pub mod client;
pub mod messages;

pub use backends::{
    generation_output, recognition_event, NatsGenerationService, NatsNarrator,
    NatsRecognitionBackend,
};
pub use client::NatsClient;
pub use messages::{CancelSpeech, GenerationReply, GenerationRequest, SpeakRequest, TranscriptMessage};
