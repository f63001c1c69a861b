//! LLM integration for BrainBot.
//!
//! Supports:
//! - **Gemini**: direct `generateContent` REST calls via reqwest
//!
//! Callers depend on the `LlmProvider` trait only, so tests can swap in a
//! stub provider.

pub mod gemini;
pub mod provider;

pub use gemini::GeminiProvider;
pub use provider::*;

use std::sync::Arc;

use crate::error::LlmError;

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Gemini,
}

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: secrecy::SecretString,
    pub model: String,
    /// Override for the API root; `None` uses the provider default.
    pub base_url: Option<String>,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.backend {
        LlmBackend::Gemini => create_gemini_provider(config),
    }
}

fn create_gemini_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    if config.model.trim().is_empty() {
        return Err(LlmError::RequestFailed {
            provider: "gemini".to_string(),
            reason: "Model name must not be empty".to_string(),
        });
    }

    let mut provider = GeminiProvider::new(config.api_key.clone(), &config.model);
    if let Some(ref base_url) = config.base_url {
        provider = provider.with_base_url(base_url);
    }

    tracing::info!("Using Gemini (model: {})", config.model);
    Ok(Arc::new(provider))
}
