use super::model::SessionMode;
use serde::{Deserialize, Serialize};

/// Configuration for a live session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Conversation style for new sessions
    /// Default: freeform
    #[serde(default)]
    pub mode: SessionMode,

    /// Seed every new session with an assistant welcome turn
    #[serde(default = "default_greeting")]
    pub greeting: bool,
}

fn default_greeting() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: SessionMode::Freeform,
            greeting: true,
        }
    }
}

/// Opening assistant turn for a session in `mode`
pub fn greeting_text(mode: SessionMode) -> &'static str {
    match mode {
        SessionMode::Guided => {
            "Hello! I'll guide you through a structured session today. Let's start with how \
             you're feeling right now. On a scale of 1-10, how would you rate your current \
             emotional state?"
        }
        SessionMode::Freeform => {
            "Hello! I'm here to listen and support you. Feel free to share whatever is on \
             your mind today. How are you feeling?"
        }
    }
}
