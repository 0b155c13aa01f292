use super::clock::{Clock, SystemClock};
use super::config::{greeting_text, SessionConfig};
use super::context::ContextAssembler;
use super::finalizer::{SessionDraft, SessionFinalizer};
use super::log::MessageLog;
use super::model::{Channel, SessionMode, Speaker, StoredSession, Turn};
use super::snapshot::SessionSnapshot;
use super::transcript::TranscriptBuffer;
use crate::error::{Result, SessionError};
use crate::generation::{GenerationService, ResponseGenerator};
use crate::profile::ProfileProvider;
use crate::speech::{CaptureState, Narrator, PlaybackController, RecognitionBackend, RecognitionSignal, SpeechCapture};
use crate::store::SessionStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Lifecycle of the live session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No user turn yet
    Idle,
    Active,
    /// Summary and persistence in flight
    Finalizing,
    /// Persisted; the record is immutable
    Completed,
}

impl SessionState {
    fn as_str(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Active => "active",
            SessionState::Finalizing => "finalizing",
            SessionState::Completed => "completed",
        }
    }
}

/// Result of one submitted user turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub user_turn: Turn,
    /// `None` when the reply arrived after the session moved on and was discarded
    pub reply: Option<Turn>,
}

/// Result of an end request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "session", rename_all = "snake_case")]
pub enum EndOutcome {
    Completed(StoredSession),
    /// Another end request is already finalizing this session
    AlreadyFinalizing,
}

struct EngineState {
    state: SessionState,
    session_id: Uuid,
    mode: SessionMode,
    channel: Channel,
    started_at: Option<DateTime<Utc>>,
    log: MessageLog,
    buffer: TranscriptBuffer,
    capture: SpeechCapture,
    /// Advanced whenever the session leaves `Active` or is replaced
    session_epoch: u64,
    /// Epoch of the outstanding reply request, if any
    pending_turn: Option<u64>,
    completed: Option<StoredSession>,
}

impl EngineState {
    fn fresh(mode: SessionMode, greeting: bool, now: DateTime<Utc>, epoch: u64) -> Self {
        let mut log = MessageLog::new();
        if greeting {
            log.append(Speaker::Assistant, greeting_text(mode), now);
        }

        Self {
            state: SessionState::Idle,
            session_id: Uuid::new_v4(),
            mode,
            channel: Channel::Text,
            started_at: None,
            log,
            buffer: TranscriptBuffer::new(),
            capture: SpeechCapture::new(),
            session_epoch: epoch,
            pending_turn: None,
            completed: None,
        }
    }

    fn reject_if_closed(&self) -> Result<()> {
        match self.state {
            SessionState::Finalizing | SessionState::Completed => {
                Err(SessionError::SessionClosed(self.state.as_str()))
            }
            SessionState::Idle | SessionState::Active => Ok(()),
        }
    }
}

/// Drives one conversation at a time: turns, speech capture, playback and
/// finalization. All mutations are serialized through one lock.
#[derive(Clone)]
pub struct SessionEngine {
    inner: Arc<Mutex<EngineState>>,
    config: SessionConfig,
    generator: ResponseGenerator,
    finalizer: SessionFinalizer,
    profiles: Arc<dyn ProfileProvider>,
    recognizer: Option<Arc<dyn RecognitionBackend>>,
    playback: PlaybackController,
    clock: Arc<dyn Clock>,
}

/// Builder for `SessionEngine`; speech services are optional
pub struct SessionEngineBuilder {
    config: SessionConfig,
    generation: Arc<dyn GenerationService>,
    store: Arc<dyn SessionStore>,
    profiles: Arc<dyn ProfileProvider>,
    recognizer: Option<Arc<dyn RecognitionBackend>>,
    narrator: Option<Arc<dyn Narrator>>,
    clock: Arc<dyn Clock>,
}

impl SessionEngineBuilder {
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn recognizer(mut self, recognizer: Arc<dyn RecognitionBackend>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn narrator(mut self, narrator: Arc<dyn Narrator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> SessionEngine {
        let generator = ResponseGenerator::new(self.generation);
        let finalizer = SessionFinalizer::new(generator.clone(), self.store);
        let state = EngineState::fresh(self.config.mode, self.config.greeting, self.clock.now(), 0);

        info!(
            "Session engine ready: {} (mode={:?}, recognition={}, narration={})",
            state.session_id,
            state.mode,
            self.recognizer.as_ref().map(|r| r.name()).unwrap_or("none"),
            self.narrator.is_some()
        );

        SessionEngine {
            inner: Arc::new(Mutex::new(state)),
            config: self.config,
            generator,
            finalizer,
            profiles: self.profiles,
            recognizer: self.recognizer,
            playback: PlaybackController::new(self.narrator),
            clock: self.clock,
        }
    }
}

impl SessionEngine {
    pub fn builder(
        generation: Arc<dyn GenerationService>,
        store: Arc<dyn SessionStore>,
        profiles: Arc<dyn ProfileProvider>,
    ) -> SessionEngineBuilder {
        SessionEngineBuilder {
            config: SessionConfig::default(),
            generation,
            store,
            profiles,
            recognizer: None,
            narrator: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the text being composed with typed input
    pub async fn set_input(&self, text: impl Into<String>) -> Result<()> {
        let mut st = self.inner.lock().await;
        st.reject_if_closed()?;
        st.buffer.set_input(text);
        Ok(())
    }

    /// Set the input to `text` and submit it as the next user turn
    pub async fn send(&self, text: impl Into<String>) -> Result<TurnOutcome> {
        self.set_input(text).await?;
        self.submit().await
    }

    /// Submit the composed text as a user turn and generate the reply.
    ///
    /// The first submitted turn starts the session. A generation failure keeps
    /// the user turn in the log without a reply.
    pub async fn submit(&self) -> Result<TurnOutcome> {
        // A new user action interrupts narration
        self.playback.cancel().await;

        let profile = self.profiles.current_user().await?;

        let (prompt, epoch, user_turn) = {
            let mut st = self.inner.lock().await;
            st.reject_if_closed()?;
            if st.pending_turn.is_some() {
                warn!("Rejecting turn: a reply is still being generated");
                return Err(SessionError::TurnInFlight);
            }

            let text = st.buffer.committed_text.trim().to_string();
            if text.is_empty() {
                return Err(SessionError::EmptyUtterance);
            }
            st.buffer.take();

            let now = self.clock.now();
            if st.state == SessionState::Idle {
                st.state = SessionState::Active;
                st.started_at = Some(now);
                info!("Session {} started", st.session_id);
            }

            let assembler = ContextAssembler::new(st.mode, profile.focus_areas);
            let prompt = assembler.assemble(&st.log, &text);
            let user_turn = st.log.append(Speaker::User, text, now).clone();

            let epoch = st.session_epoch;
            st.pending_turn = Some(epoch);
            (prompt, epoch, user_turn)
        };

        debug!("Requesting reply for turn {}", user_turn.sequence);
        let result = self.generator.reply(&prompt).await;

        let mut st = self.inner.lock().await;
        if st.pending_turn == Some(epoch) {
            st.pending_turn = None;
        }

        if st.session_epoch != epoch || st.state != SessionState::Active {
            info!(
                "Discarding reply to turn {}: session is {}",
                user_turn.sequence,
                st.state.as_str()
            );
            return Ok(TurnOutcome {
                user_turn,
                reply: None,
            });
        }

        let text = match result {
            Ok(text) => text,
            Err(e) => {
                error!("Reply generation failed for turn {}: {}", user_turn.sequence, e);
                return Err(e.into());
            }
        };

        let reply = st.log.append(Speaker::Assistant, text, self.clock.now()).clone();

        // Narration must start before the engine lock is released
        if st.channel == Channel::Voice {
            if let Err(e) = self.playback.narrate(reply.text.clone()).await {
                warn!("Reply not narrated: {}", e);
            }
        }
        drop(st);

        Ok(TurnOutcome {
            user_turn,
            reply: Some(reply),
        })
    }

    /// Start continuous speech capture into the transcript buffer
    pub async fn start_listening(&self) -> Result<()> {
        let recognizer = self
            .recognizer
            .clone()
            .ok_or(SessionError::CapabilityUnavailable("speech recognition"))?;

        {
            let st = self.inner.lock().await;
            st.reject_if_closed()?;
            if st.capture.state() == CaptureState::Listening {
                debug!("Already listening");
                return Ok(());
            }
        }

        self.playback.cancel().await;

        let rx = recognizer.start().await.map_err(|e| {
            warn!("Failed to start {} recognition: {}", recognizer.name(), e);
            SessionError::CapabilityUnavailable("speech recognition")
        })?;

        let epoch = {
            let mut st = self.inner.lock().await;
            // The session may have ended while the stream was starting
            if let Err(e) = st.reject_if_closed() {
                drop(st);
                info!("Discarding recognition stream: {}", e);
                if let Err(stop_err) = recognizer.stop().await {
                    warn!("Failed to stop {} recognition: {}", recognizer.name(), stop_err);
                }
                return Err(e);
            }
            st.channel = Channel::Voice;
            st.capture.begin()
        };

        let engine = self.clone();
        tokio::spawn(async move {
            engine.pump_recognition(epoch, rx).await;
        });

        Ok(())
    }

    /// Stop speech capture; callbacks still in flight are dropped
    pub async fn stop_listening(&self) -> Result<()> {
        let was_listening = {
            let mut st = self.inner.lock().await;
            let was_listening = st.capture.state() == CaptureState::Listening;
            st.capture.stop();
            st.buffer.clear_interim();
            was_listening
        };

        if was_listening {
            if let Some(recognizer) = &self.recognizer {
                if let Err(e) = recognizer.stop().await {
                    warn!("Failed to stop {} recognition: {}", recognizer.name(), e);
                }
            }
        }

        Ok(())
    }

    /// Apply one recognition signal from the stream tagged `epoch`.
    ///
    /// Returns `false` when the stream instance is stale.
    pub async fn deliver_recognition(&self, epoch: u64, signal: RecognitionSignal) -> bool {
        let mut st = self.inner.lock().await;
        let EngineState {
            capture, buffer, ..
        } = &mut *st;
        capture.handle(epoch, signal, buffer)
    }

    async fn pump_recognition(&self, epoch: u64, mut rx: mpsc::Receiver<RecognitionSignal>) {
        debug!("Recognition pump started (epoch {})", epoch);

        while let Some(signal) = rx.recv().await {
            let terminal = !matches!(signal, RecognitionSignal::Event(_));
            if !self.deliver_recognition(epoch, signal).await || terminal {
                debug!("Recognition pump stopped (epoch {})", epoch);
                return;
            }
        }

        // Sender dropped without an explicit end
        self.deliver_recognition(epoch, RecognitionSignal::End).await;
        debug!("Recognition pump drained (epoch {})", epoch);
    }

    /// End the session: summarize, persist, and move to `Completed`.
    ///
    /// On failure the session returns to `Active` with its log untouched and
    /// nothing persisted, so the end can be retried.
    pub async fn end_session(&self) -> Result<EndOutcome> {
        let (draft, was_listening) = {
            let mut st = self.inner.lock().await;
            match st.state {
                SessionState::Idle | SessionState::Completed => {
                    return Err(SessionError::NoActiveSession)
                }
                SessionState::Finalizing => {
                    info!("End already in progress for session {}", st.session_id);
                    return Ok(EndOutcome::AlreadyFinalizing);
                }
                SessionState::Active => {}
            }

            let ended_at = self.clock.now();
            let started_at = st.started_at.unwrap_or(ended_at);

            st.state = SessionState::Finalizing;
            st.session_epoch += 1;
            let was_listening = st.capture.state() == CaptureState::Listening;
            st.capture.stop();
            st.buffer.clear_interim();
            info!("Session {} finalizing", st.session_id);

            let draft = SessionDraft {
                session_id: st.session_id,
                mode: st.mode,
                channel: st.channel,
                started_at,
                ended_at,
                log: st.log.clone(),
            };
            (draft, was_listening)
        };

        self.playback.cancel().await;
        if was_listening {
            if let Some(recognizer) = &self.recognizer {
                if let Err(e) = recognizer.stop().await {
                    warn!("Failed to stop {} recognition: {}", recognizer.name(), e);
                }
            }
        }

        let result = self.finalizer.finalize(draft).await;

        let mut st = self.inner.lock().await;
        match result {
            Ok(stored) => {
                st.state = SessionState::Completed;
                st.completed = Some(stored.clone());
                info!("Session {} completed", st.session_id);
                Ok(EndOutcome::Completed(stored))
            }
            Err(e) => {
                st.state = SessionState::Active;
                error!("Session {} stays active: {}", st.session_id, e);
                Err(e)
            }
        }
    }

    /// Replace a completed (or untouched) session with a fresh one
    pub async fn start_new_session(&self, mode: Option<SessionMode>) -> Result<SessionSnapshot> {
        {
            let mut st = self.inner.lock().await;
            if matches!(st.state, SessionState::Active | SessionState::Finalizing) {
                return Err(SessionError::SessionInProgress);
            }

            let mode = mode.unwrap_or(st.mode);
            let epoch = st.session_epoch + 1;
            *st = EngineState::fresh(mode, self.config.greeting, self.clock.now(), epoch);
            info!("New session {} (mode={:?})", st.session_id, mode);
        }

        self.playback.cancel().await;
        Ok(self.snapshot().await)
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    /// Current transcript buffer contents
    pub async fn transcript(&self) -> TranscriptBuffer {
        self.inner.lock().await.buffer.clone()
    }

    pub async fn turns(&self) -> Vec<Turn> {
        self.inner.lock().await.log.turns().to_vec()
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let playback = self.playback.state().await;
        let st = self.inner.lock().await;

        let duration_secs = st
            .started_at
            .map(|started| {
                self.clock
                    .now()
                    .signed_duration_since(started)
                    .num_milliseconds() as f64
                    / 1000.0
            })
            .unwrap_or(0.0);

        SessionSnapshot {
            session_id: st.session_id,
            state: st.state,
            mode: st.mode,
            channel: st.channel,
            started_at: st.started_at,
            duration_secs,
            turns: st.log.turns().to_vec(),
            transcript: st.buffer.clone(),
            capture: st.capture.state(),
            playback,
            turn_in_flight: st.pending_turn.is_some(),
            completed: st.completed.clone(),
        }
    }
}
