//! Conversation and message values.
//!
//! A `Conversation` is owned by one chat session and threaded through each
//! turn by value: every transition consumes the old value and returns a new
//! one, so there is no shared mutable state to coordinate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::onboarding::{ConversationPhase, Grade, WELCOME_MESSAGE};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }
}

/// Per-session chat state: the captured grade and the message history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    grade: Option<Grade>,
    history: Vec<Message>,
}

impl Conversation {
    /// An empty conversation with no grade.
    pub fn new() -> Self {
        Self::default()
    }

    /// A conversation opened with the welcome message asking for the grade.
    pub fn greeted() -> Self {
        Self::new().with_message(Message::assistant(WELCOME_MESSAGE))
    }

    pub fn grade(&self) -> Option<Grade> {
        self.grade
    }

    pub fn phase(&self) -> ConversationPhase {
        match self.grade {
            Some(_) => ConversationPhase::Active,
            None => ConversationPhase::AwaitingGrade,
        }
    }

    /// Messages in display order.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.history.last()
    }

    /// Append a message.
    pub fn with_message(mut self, message: Message) -> Self {
        self.history.push(message);
        self
    }

    /// Capture the grade. A grade that is already set is never replaced.
    pub fn with_grade(mut self, grade: Grade) -> Self {
        if self.phase().can_transition_to(ConversationPhase::Active) {
            self.grade = Some(grade);
        } else {
            tracing::debug!(
                kept = ?self.grade,
                ignored = %grade,
                "Grade already captured, ignoring new value"
            );
        }
        self
    }
}
