//! Error types for chatline.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! Error kinds fall into four groups:
//! - **History**: empty-store conditions surfaced by `read_last`/`delete_last`
//! - **Input**: rejected prompts and bad configuration values
//! - **Service**: completion request failures (auth, rate limit, transport)
//! - **Persistence/Internal**: storage and I/O failures
//!
//! No error triggers an automatic retry; every failure is surfaced to the
//! user and mapped to a process exit code via [`ChatlineError::exit_code`].

use thiserror::Error;

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ChatlineError>;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure (service, persistence, I/O)
    GeneralError = 1,
    /// History was empty where a message was required
    EmptyHistory = 2,
    /// Invalid prompt or configuration
    UsageError = 3,
    /// Completion request timed out
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for chatline operations.
#[derive(Error, Debug)]
pub enum ChatlineError {
    // ==========================================================================
    // History errors
    // ==========================================================================
    /// The history store holds no messages.
    #[error("there are no messages in the history yet")]
    EmptyHistory,

    // ==========================================================================
    // Input errors
    // ==========================================================================
    /// Prompt rejected before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// API key not supplied via flag or environment.
    #[error("API key not set: export {name} or pass --api-key")]
    ApiKeyMissing { name: &'static str },

    // ==========================================================================
    // Service errors
    // ==========================================================================
    /// Completion request timed out.
    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    /// Transport-level failure (DNS, connection refused, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// Credentials rejected by the completion service.
    #[error("API key rejected: {message}")]
    AuthRejected { message: String },

    /// Rate limited by the completion service.
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    /// Completion service returned a non-success status.
    #[error("API error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    /// Completion response body could not be decoded.
    #[error("failed to parse response: {0}")]
    ParseResponse(String),

    // ==========================================================================
    // Persistence and internal errors
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors (rusqlite failures are wrapped here).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChatlineError {
    /// Map error to process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::EmptyHistory => ExitCode::EmptyHistory,

            Self::InvalidInput(_) | Self::Config(_) | Self::ApiKeyMissing { .. } => {
                ExitCode::UsageError
            }

            Self::Timeout(_) => ExitCode::Timeout,

            Self::Network(_)
            | Self::AuthRejected { .. }
            | Self::RateLimited { .. }
            | Self::ApiError { .. }
            | Self::ParseResponse(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Whether the failure came from the completion service rather than
    /// local state. Used by the ask flow to decide what to log.
    #[must_use]
    pub const fn is_service_failure(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_)
                | Self::Network(_)
                | Self::AuthRejected { .. }
                | Self::RateLimited { .. }
                | Self::ApiError { .. }
                | Self::ParseResponse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_maps_to_exit_code_2() {
        assert_eq!(
            ChatlineError::EmptyHistory.exit_code(),
            ExitCode::EmptyHistory
        );
        assert_eq!(i32::from(ChatlineError::EmptyHistory.exit_code()), 2);
    }

    #[test]
    fn input_errors_map_to_usage_exit_code() {
        let err = ChatlineError::InvalidInput("empty prompt".to_string());
        assert_eq!(err.exit_code(), ExitCode::UsageError);

        let err = ChatlineError::ApiKeyMissing {
            name: "OPENAI_API_KEY",
        };
        assert_eq!(err.exit_code(), ExitCode::UsageError);
    }

    #[test]
    fn service_errors_are_flagged() {
        assert!(ChatlineError::Timeout(30).is_service_failure());
        assert!(
            ChatlineError::RateLimited {
                message: "slow down".to_string()
            }
            .is_service_failure()
        );
        assert!(!ChatlineError::EmptyHistory.is_service_failure());
    }

    #[test]
    fn api_error_display_includes_status() {
        let err = ChatlineError::ApiError {
            status: Some(500),
            message: "server exploded".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 500): server exploded");

        let err = ChatlineError::ApiError {
            status: None,
            message: "unknown".to_string(),
        };
        assert_eq!(err.to_string(), "API error: unknown");
    }
}
