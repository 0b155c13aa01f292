pub mod analytics;
pub mod config;
pub mod error;
pub mod generation;
pub mod http;
pub mod nats;
pub mod profile;
pub mod session;
pub mod speech;
pub mod store;

pub use analytics::{compute_insights, InsightsReport};
pub use config::Config;
pub use error::{AuthError, GenerationError, PersistError, SessionError};
pub use generation::{GenerationOutput, GenerationService, ResponseGenerator};
pub use http::{create_router, AppState};
pub use nats::{NatsClient, NatsGenerationService, NatsNarrator, NatsRecognitionBackend};
pub use profile::{Profile, ProfileProvider, StaticProfileProvider};
pub use session::{
    EndOutcome, Mood, SessionConfig, SessionEngine, SessionMode, SessionRecord, SessionSnapshot,
    SessionState, StoredSession, TranscriptBuffer, Turn, TurnOutcome,
};
pub use speech::{Narrator, PlaybackController, RecognitionBackend, RecognitionSignal};
pub use store::{JsonFileSessionStore, MemorySessionStore, SessionStore, SortOrder};
