//! BrainBot: grade-aware learning chat assistant for elementary students.

pub mod assistant;
pub mod channels;
pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod onboarding;
pub mod routes;
