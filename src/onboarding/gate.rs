//! Onboarding gate: holds free-form chat back until a grade is captured.

use tracing::debug;

use super::grade::{Grade, extract_grade};
use crate::conversation::Conversation;

/// What the gate decided for one incoming user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// A grade was found in the reply; the conversation becomes active.
    Captured(Grade),
    /// No grade yet and none found; ask again.
    Reprompt,
    /// Grade already known; pass the message on to the model.
    Forward(Grade),
}

/// Decide how to handle `text` given the conversation so far.
///
/// Extraction only runs while the conversation has no grade. Once a grade is
/// set, the text is never scanned again.
pub fn evaluate(conversation: &Conversation, text: &str) -> GateDecision {
    if let Some(grade) = conversation.grade() {
        return GateDecision::Forward(grade);
    }

    match extract_grade(text) {
        Some(grade) => {
            debug!(grade = %grade, "Grade captured from reply");
            GateDecision::Captured(grade)
        }
        None => {
            debug!("No grade found in reply");
            GateDecision::Reprompt
        }
    }
}
