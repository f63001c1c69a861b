//! Configuration types, built from environment variables.

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::gemini::{DEFAULT_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::llm::{LlmBackend, LlmConfig};

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "BRAINBOT_MODEL";
pub const BASE_URL_VAR: &str = "BRAINBOT_GEMINI_BASE_URL";
pub const HTTP_PORT_VAR: &str = "BRAINBOT_HTTP_PORT";
pub const MAX_OUTPUT_TOKENS_VAR: &str = "BRAINBOT_MAX_OUTPUT_TOKENS";
pub const TEMPERATURE_VAR: &str = "BRAINBOT_TEMPERATURE";

/// Generation settings sent with every chat request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 200,
            temperature: 0.7,
        }
    }
}

/// Full assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub llm: LlmConfig,
    pub generation: GenerationConfig,
    /// Port for the HTTP API. `None` runs the terminal chat only.
    pub http_port: Option<u16>,
}

impl AssistantConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key =
            get(API_KEY_VAR).ok_or_else(|| ConfigError::MissingEnvVar(API_KEY_VAR.to_string()))?;
        let model = get(MODEL_VAR).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let base_url = get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let defaults = GenerationConfig::default();
        let max_output_tokens = parse_var(MAX_OUTPUT_TOKENS_VAR, get(MAX_OUTPUT_TOKENS_VAR))?
            .unwrap_or(defaults.max_output_tokens);
        let temperature =
            parse_var(TEMPERATURE_VAR, get(TEMPERATURE_VAR))?.unwrap_or(defaults.temperature);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue {
                key: TEMPERATURE_VAR.to_string(),
                message: format!("{temperature} is outside 0.0-2.0"),
            });
        }

        let http_port = parse_var(HTTP_PORT_VAR, get(HTTP_PORT_VAR))?;

        Ok(Self {
            llm: LlmConfig {
                backend: LlmBackend::Gemini,
                api_key: SecretString::from(api_key),
                model,
                base_url: Some(base_url),
            },
            generation: GenerationConfig {
                max_output_tokens,
                temperature,
            },
            http_port,
        })
    }
}

fn parse_var<T>(key: &str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{raw:?}: {e}"),
            })
        })
        .transpose()
}
