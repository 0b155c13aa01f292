// Shared fakes for the session engine's collaborators
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use dilse::error::{GenerationError, PersistError};
use dilse::generation::{GenerationOutput, GenerationService};
use dilse::session::{Clock, SessionRecord, StoredSession};
use dilse::speech::{Narrator, RecognitionBackend, RecognitionSignal};
use dilse::store::{MemorySessionStore, SessionStore, SortOrder};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Notify};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
}

/// Poll `check` until it returns true (about one second)
pub async fn wait_for<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    false
}

// ============================================================================
// Clock
// ============================================================================

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(start),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ============================================================================
// Generation
// ============================================================================

pub fn valid_summary() -> Value {
    json!({
        "summary": "The user talked about poor sleep and work stress.",
        "key_topics": ["sleep", "work"],
        "mood_assessment": "happy",
        "recommended_activities": [
            {"activity": "Evening walk", "description": "Twenty minutes outside after dinner"},
            {"activity": "Journaling", "description": "Write down three good things"},
            {"activity": "Breathing", "description": "Box breathing before bed"}
        ]
    })
}

/// Replays scripted outputs in invocation order and records every prompt
#[derive(Default)]
pub struct ScriptedGeneration {
    script: Mutex<VecDeque<Result<GenerationOutput, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
    /// When set, free-text (reply) calls wait for a notification
    reply_gate: Option<Arc<Notify>>,
}

impl ScriptedGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            reply_gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Ok(GenerationOutput::Text(text.to_string())))
    }

    pub fn summary(self, value: Value) -> Self {
        self.push(Ok(GenerationOutput::Structured(value)))
    }

    pub fn failure(self, err: GenerationError) -> Self {
        self.push(Err(err))
    }

    pub fn push(self, step: Result<GenerationOutput, GenerationError>) -> Self {
        self.script.lock().unwrap().push_back(step);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GenerationService for ScriptedGeneration {
    async fn invoke(
        &self,
        prompt: &str,
        schema: Option<&Value>,
    ) -> Result<GenerationOutput, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Transport("script exhausted".into())));

        if schema.is_none() {
            if let Some(gate) = &self.reply_gate {
                gate.notified().await;
            }
        }

        step
    }
}

// ============================================================================
// Persistence
// ============================================================================

/// Memory store whose first `failures` creates fail
pub struct FlakyStore {
    inner: MemorySessionStore,
    failures: AtomicUsize,
    pub attempts: AtomicUsize,
}

impl FlakyStore {
    pub fn failing(failures: usize) -> Self {
        Self {
            inner: MemorySessionStore::new(),
            failures: AtomicUsize::new(failures),
            attempts: AtomicUsize::new(0),
        }
    }

    pub async fn stored(&self) -> usize {
        self.inner.len().await
    }
}

#[async_trait::async_trait]
impl SessionStore for FlakyStore {
    async fn create(&self, record: SessionRecord) -> Result<StoredSession, PersistError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(PersistError::Storage("database unavailable".into()));
        }
        self.inner.create(record).await
    }

    async fn list(
        &self,
        order: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<StoredSession>, PersistError> {
        self.inner.list(order, limit).await
    }
}

// ============================================================================
// Speech
// ============================================================================

/// Recognition backend whose stream is fed by the test
#[derive(Default)]
pub struct ChannelRecognizer {
    sender: tokio::sync::Mutex<Option<mpsc::Sender<RecognitionSignal>>>,
    /// Calls to `start`, counted on entry
    pub attempts: AtomicUsize,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    /// When set, `start` waits for a notification before opening the stream
    start_gate: Option<Arc<Notify>>,
}

impl ChannelRecognizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn gated(gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            start_gate: Some(gate),
            ..Self::default()
        })
    }

    pub async fn sender(&self) -> mpsc::Sender<RecognitionSignal> {
        self.sender
            .lock()
            .await
            .clone()
            .expect("recognition stream not started")
    }
}

#[async_trait::async_trait]
impl RecognitionBackend for ChannelRecognizer {
    async fn start(&self) -> Result<mpsc::Receiver<RecognitionSignal>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.start_gate {
            gate.notified().await;
        }
        let (tx, rx) = mpsc::channel(16);
        *self.sender.lock().await = Some(tx);
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(rx)
    }

    async fn stop(&self) -> Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "channel"
    }
}

/// Narrator that records what it was asked to say.
///
/// With `blocking`, each narration lasts until `finish` is notified.
#[derive(Default)]
pub struct RecordingNarrator {
    pub spoken: Mutex<Vec<String>>,
    pub cancels: AtomicUsize,
    finish: Option<Arc<Notify>>,
}

impl RecordingNarrator {
    pub fn instant() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn blocking(finish: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            finish: Some(finish),
            ..Self::default()
        })
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Narrator for RecordingNarrator {
    async fn speak(&self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        if let Some(finish) = &self.finish {
            finish.notified().await;
        }
        Ok(())
    }

    async fn cancel(&self) -> Result<()> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
