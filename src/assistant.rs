//! Chat assistant: runs one conversation turn at a time.
//!
//! `submit` takes the conversation by value and hands back the next one along
//! with the assistant's reply. Model failures never escape: they are logged
//! and replaced with the fixed fallback message, and the conversation stays
//! usable.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::GenerationConfig;
use crate::conversation::{Conversation, Message};
use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};
use crate::onboarding::{
    FALLBACK_MESSAGE, GRADE_REPROMPT, GateDecision, Grade, evaluate, grade_acknowledgement,
    system_instruction,
};

/// Grade-aware chat assistant over an LLM provider.
pub struct ChatAssistant {
    llm: Arc<dyn LlmProvider>,
    generation: GenerationConfig,
}

impl ChatAssistant {
    pub fn new(llm: Arc<dyn LlmProvider>, generation: GenerationConfig) -> Self {
        Self { llm, generation }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Handle one user message.
    ///
    /// `user_text` must already be trimmed and non-empty. Returns the updated
    /// conversation and the assistant message that was appended to it.
    pub async fn submit(
        &self,
        conversation: Conversation,
        user_text: &str,
    ) -> (Conversation, Message) {
        let decision = evaluate(&conversation, user_text);
        let mut conversation = conversation.with_message(Message::user(user_text));

        let reply = match decision {
            GateDecision::Captured(grade) => {
                info!(grade = %grade, band = %grade.band(), "Conversation active");
                conversation = conversation.with_grade(grade);
                grade_acknowledgement(grade)
            }
            GateDecision::Reprompt => GRADE_REPROMPT.to_string(),
            GateDecision::Forward(grade) => match self.generate_reply(grade, user_text).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(grade = %grade, error = %e, "Chat reply failed, sending fallback");
                    FALLBACK_MESSAGE.to_string()
                }
            },
        };

        let message = Message::assistant(reply);
        (conversation.with_message(message.clone()), message)
    }

    /// Ask the model for a reply to `user_text`, tuned for `grade`.
    ///
    /// Each call is a fresh request carrying only the system instruction and
    /// this one message. The reply text is returned as-is.
    pub async fn generate_reply(&self, grade: Grade, user_text: &str) -> Result<String, LlmError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(system_instruction(grade)),
            ChatMessage::user(user_text),
        ])
        .with_max_tokens(self.generation.max_output_tokens)
        .with_temperature(self.generation.temperature);

        let response = self.llm.complete(request).await?;
        tracing::debug!(
            model = %self.llm.model_name(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Chat reply received"
        );
        Ok(response.content)
    }
}
