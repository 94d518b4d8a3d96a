//! Per-invocation configuration for the completion client.
//!
//! Built once from CLI flags and environment at startup and passed down
//! explicitly; nothing in the crate reads configuration from globals.

use crate::error::{ChatlineError, Result};

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default chat completions endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1/chat/completions";

/// Default model when neither flag nor env specify one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default completion token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Completion service configuration for one CLI invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// API credential. Only required for the ask action.
    pub api_key: Option<String>,
    /// Model name sent with each request.
    pub model: String,
    /// Chat completions endpoint URL.
    pub api_base: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens in the completion.
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error for an out-of-range temperature, a zero token
    /// budget, or an empty endpoint.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ChatlineError::Config(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ChatlineError::Config(
                "max-tokens must be greater than 0".to_string(),
            ));
        }
        if self.api_base.trim().is_empty() {
            return Err(ChatlineError::Config(
                "api-base must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The API key, or the error telling the user how to supply one.
    ///
    /// # Errors
    /// Returns [`ChatlineError::ApiKeyMissing`] when no key is configured.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ChatlineError::ApiKeyMissing { name: API_KEY_ENV })
    }
}
