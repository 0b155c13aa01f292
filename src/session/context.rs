use super::log::MessageLog;
use super::model::{SessionMode, Turn};

/// Number of prior turns (any speaker) included in each prompt
pub const CONTEXT_WINDOW_TURNS: usize = 6;

/// Placeholder used when the profile lists no focus areas
pub const DEFAULT_FOCUS: &str = "General support";

/// Builds the bounded prompt sent to the generation service for each turn
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    mode: SessionMode,
    focus_areas: Vec<String>,
}

impl ContextAssembler {
    pub fn new(mode: SessionMode, focus_areas: Vec<String>) -> Self {
        Self { mode, focus_areas }
    }

    /// Select the window: the last `CONTEXT_WINDOW_TURNS` entries of `prior`
    pub fn window(prior: &MessageLog) -> &[Turn] {
        prior.last(CONTEXT_WINDOW_TURNS)
    }

    /// Assemble the prompt for `utterance`, given the turns that preceded it.
    ///
    /// The window lines are immediately followed by the utterance line.
    pub fn assemble(&self, prior: &MessageLog, utterance: &str) -> String {
        let mode_line = match self.mode {
            SessionMode::Guided => "Guided session with a structured approach",
            SessionMode::Freeform => "Free-form supportive conversation",
        };

        let focus = if self.focus_areas.is_empty() {
            DEFAULT_FOCUS.to_string()
        } else {
            self.focus_areas.join(", ")
        };

        let recent = Self::window(prior)
            .iter()
            .map(|t| format!("{}: {}", t.speaker.context_label(), t.text))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are an empathetic support companion. Reply to the user with warmth and \
             professional care. Reply in 2-3 sentences. Lean on reflective listening, \
             open-ended questions, validation of feelings and gentle guidance toward insight.\n\
             \n\
             Mode: {mode_line}\n\
             User's focus areas: {focus}\n\
             \n\
             Recent conversation:\n\
             {recent}\n\
             User's new message: {utterance}"
        )
    }
}
