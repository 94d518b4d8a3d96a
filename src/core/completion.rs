//! Completion client for OpenAI-compatible chat APIs.
//!
//! Request and response payloads are typed serde structs; the client returns
//! the assistant text or a typed error. There are no retries: a failed
//! request surfaces immediately so the caller can abort without touching
//! the history store.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::core::config::Config;
use crate::core::http::{self, DEFAULT_TIMEOUT};
use crate::core::models::Message;
use crate::error::{ChatlineError, Result};

/// One message on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

/// Chat completions request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Chat completions response body (fields we consume).
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: WireMessage,
}

/// Error body shape returned by OpenAI-compatible services.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for a chat completions endpoint.
pub struct ChatClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f64,
    max_tokens: u32,
}

impl ChatClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// Returns an error if no API key is configured, the configuration is
    /// invalid, or the underlying HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let api_key = config.require_api_key()?.to_string();

        Ok(Self {
            client: http::build_client(DEFAULT_TIMEOUT)?,
            api_key,
            model: config.model.clone(),
            endpoint: config.api_base.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Send the conversation and return the assistant's reply text.
    ///
    /// # Errors
    /// Returns a typed error for timeouts, transport failures, non-success
    /// statuses, and undecodable responses. The caller must not mutate the
    /// history store when this fails.
    pub async fn complete(&self, messages: &[Message]) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.iter().map(WireMessage::from).collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(
            model = %self.model,
            turns = messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatlineError::Timeout(DEFAULT_TIMEOUT.as_secs())
                } else {
                    ChatlineError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(status, response).await);
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatlineError::ParseResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ChatlineError::ParseResponse("response contained no choices".to_string()))
    }
}

/// Map a non-success HTTP status to a typed error, pulling the service's
/// own message out of the body when it has one.
async fn error_for_status(status: StatusCode, response: reqwest::Response) -> ChatlineError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map_or_else(|_| fallback_message(&body, status), |b| b.error.message);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChatlineError::AuthRejected { message },
        StatusCode::TOO_MANY_REQUESTS => ChatlineError::RateLimited { message },
        _ => ChatlineError::ApiError {
            status: Some(status.as_u16()),
            message,
        },
    }
}

fn fallback_message(body: &str, status: StatusCode) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        // Cap raw bodies so an HTML error page does not flood the terminal.
        trimmed.chars().take(200).collect()
    }
}
