use crate::error::SessionError;
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Speech synthesis service contract
#[async_trait::async_trait]
pub trait Narrator: Send + Sync {
    /// Narrate `text`, resolving once narration has finished
    async fn speak(&self, text: &str) -> Result<()>;

    /// Stop whatever is being narrated
    async fn cancel(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Idle,
    Speaking,
}

#[derive(Default)]
struct PlaybackInner {
    state: PlaybackState,
    epoch: u64,
    task: Option<JoinHandle<()>>,
}

/// Narrates assistant replies with at most one narration in flight
#[derive(Clone)]
pub struct PlaybackController {
    narrator: Option<Arc<dyn Narrator>>,
    inner: Arc<Mutex<PlaybackInner>>,
}

impl PlaybackController {
    pub fn new(narrator: Option<Arc<dyn Narrator>>) -> Self {
        Self {
            narrator,
            inner: Arc::new(Mutex::new(PlaybackInner::default())),
        }
    }

    pub fn is_available(&self) -> bool {
        self.narrator.is_some()
    }

    pub async fn state(&self) -> PlaybackState {
        self.inner.lock().await.state
    }

    /// Start narrating `text`, cancelling any narration still running
    pub async fn narrate(&self, text: String) -> Result<(), SessionError> {
        let narrator = self
            .narrator
            .clone()
            .ok_or(SessionError::CapabilityUnavailable("speech synthesis"))?;

        let mut inner = self.inner.lock().await;
        if inner.state == PlaybackState::Speaking {
            Self::interrupt(&mut inner, narrator.as_ref()).await;
        }

        inner.epoch += 1;
        inner.state = PlaybackState::Speaking;
        let epoch = inner.epoch;
        let shared = Arc::clone(&self.inner);

        info!("Narration started ({} chars)", text.len());
        inner.task = Some(tokio::spawn(async move {
            if let Err(e) = narrator.speak(&text).await {
                warn!("Narration failed: {}", e);
            }

            let mut inner = shared.lock().await;
            // A newer narration or a cancel owns the state now
            if inner.epoch == epoch {
                inner.state = PlaybackState::Idle;
                inner.task = None;
                info!("Narration finished");
            }
        }));

        Ok(())
    }

    /// Cancel the narration in progress, if any
    pub async fn cancel(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state == PlaybackState::Idle {
            return;
        }

        if let Some(narrator) = &self.narrator {
            Self::interrupt(&mut inner, narrator.as_ref()).await;
        }
        inner.epoch += 1;
        inner.state = PlaybackState::Idle;
        info!("Narration cancelled");
    }

    async fn interrupt(inner: &mut PlaybackInner, narrator: &dyn Narrator) {
        if let Some(task) = inner.task.take() {
            task.abort();
        }
        if let Err(e) = narrator.cancel().await {
            warn!("Failed to cancel narration: {}", e);
        }
    }
}
