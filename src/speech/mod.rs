//! Speech side-channels of a live session
//!
//! - Capture: a continuous recognition stream merged into the transcript buffer
//! - Playback: narration of assistant replies, one at a time

pub mod capture;
pub mod playback;

pub use capture::{CaptureState, RecognitionBackend, RecognitionSignal, SpeechCapture};
pub use playback::{Narrator, PlaybackController, PlaybackState};
