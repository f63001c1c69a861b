//! Onboarding state machine: whether the student's grade is known yet.

use serde::{Deserialize, Serialize};

/// The phases of a conversation.
///
/// Progresses once: AwaitingGrade → Active. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    /// No grade captured; free-form chat is blocked.
    #[default]
    AwaitingGrade,
    /// Grade captured; messages go to the language model.
    Active,
}

impl ConversationPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: ConversationPhase) -> bool {
        matches!((self, target), (Self::AwaitingGrade, Self::Active))
    }
}

impl std::fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitingGrade => "awaiting_grade",
            Self::Active => "active",
        };
        write!(f, "{s}")
    }
}
