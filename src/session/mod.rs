//! Live session management
//!
//! This module provides the `SessionEngine` that drives one conversation:
//! - Message log and transcript buffer (typed and spoken input)
//! - Bounded context window for each generated reply
//! - Speech capture and narration side-channels
//! - Finalization: summary, mood assessment and persistence

mod clock;
mod config;
mod context;
mod engine;
mod finalizer;
mod log;
mod model;
mod snapshot;
mod transcript;

pub use clock::{Clock, SystemClock};
pub use config::{greeting_text, SessionConfig};
pub use context::{ContextAssembler, CONTEXT_WINDOW_TURNS, DEFAULT_FOCUS};
pub use engine::{EndOutcome, SessionEngine, SessionEngineBuilder, SessionState, TurnOutcome};
pub use finalizer::{SessionDraft, SessionFinalizer};
pub use log::MessageLog;
pub use model::{Activity, Channel, Mood, SessionMode, SessionRecord, Speaker, StoredSession, Turn};
pub use snapshot::SessionSnapshot;
pub use transcript::{RecognitionEvent, RecognitionResult, TranscriptBuffer};
