use crate::session::{RecognitionEvent, TranscriptBuffer};
use anyhow::Result;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Item delivered by a running recognition stream
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionSignal {
    Event(RecognitionEvent),
    Error(String),
    End,
}

/// Speech recognition backend trait
///
/// Implementations:
/// - NATS: transcripts published by an external STT service
///   (`crate::nats::NatsRecognitionBackend`)
/// - Channel-fed fakes in tests
#[async_trait::async_trait]
pub trait RecognitionBackend: Send + Sync {
    /// Start a continuous recognition stream
    ///
    /// Returns a channel receiver that will receive recognition signals
    async fn start(&self) -> Result<mpsc::Receiver<RecognitionSignal>>;

    /// Stop the current stream
    async fn stop(&self) -> Result<()>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    #[default]
    Idle,
    Listening,
}

/// Capture sub-machine.
///
/// Every stream instance is tagged with an epoch. Stopping, erroring or
/// ending the stream advances the epoch, so callbacks still in flight from an
/// older instance are recognised as stale and dropped.
#[derive(Debug, Default)]
pub struct SpeechCapture {
    state: CaptureState,
    epoch: u64,
}

impl SpeechCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Enter `Listening` with a fresh epoch
    pub fn begin(&mut self) -> u64 {
        self.epoch += 1;
        self.state = CaptureState::Listening;
        info!("Speech capture listening (epoch {})", self.epoch);
        self.epoch
    }

    /// Return to `Idle`, invalidating the current stream instance
    pub fn stop(&mut self) {
        if self.state == CaptureState::Listening {
            info!("Speech capture stopped (epoch {})", self.epoch);
        }
        self.epoch += 1;
        self.state = CaptureState::Idle;
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.state == CaptureState::Listening && self.epoch == epoch
    }

    /// Apply a signal from the stream tagged `epoch`.
    ///
    /// Returns `false` when the signal was stale and dropped.
    pub fn handle(
        &mut self,
        epoch: u64,
        signal: RecognitionSignal,
        buffer: &mut TranscriptBuffer,
    ) -> bool {
        if !self.is_current(epoch) {
            debug!(
                "Dropping stale recognition signal (epoch {}, current {})",
                epoch, self.epoch
            );
            return false;
        }

        match signal {
            RecognitionSignal::Event(event) => buffer.apply(&event),
            RecognitionSignal::Error(e) => {
                warn!("Recognition stream error: {}", e);
                buffer.clear_interim();
                self.stop();
            }
            RecognitionSignal::End => {
                info!("Recognition stream ended");
                buffer.clear_interim();
                self.stop();
            }
        }
        true
    }
}
