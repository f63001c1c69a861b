//! Onboarding: grade capture before free-form chat.
//!
//! A new conversation starts by asking the student for their grade. The gate
//! scans each reply for a grade until one is found; after that every message
//! goes to the language model with a system instruction tuned to the grade's
//! band.

pub mod gate;
pub mod grade;
pub mod prompts;
pub mod state;

pub use gate::{GateDecision, evaluate};
pub use grade::{Grade, GradeBand, extract_grade};
pub use prompts::{
    FALLBACK_MESSAGE, GRADE_REPROMPT, WELCOME_MESSAGE, grade_acknowledgement, system_instruction,
};
pub use state::ConversationPhase;
