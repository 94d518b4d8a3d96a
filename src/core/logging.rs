//! Logging setup on top of `tracing`.
//!
//! Level comes from `--log-level`, `--verbose`, or the `CHATLINE_LOG` env
//! var; `--json-output` switches to one JSON event per line on stderr.

use tracing::Level;
use tracing_subscriber::EnvFilter;

const LOG_LEVEL_ENV: &str = "CHATLINE_LOG";

/// Log level from CLI argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    #[default]
    Error,
}

impl LogLevel {
    /// Parse from CLI argument or env var (case-insensitive).
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "verbose" | "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Convert to tracing filter string.
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Convert to tracing level.
    #[must_use]
    pub const fn as_tracing_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}

/// Parse log level from the `CHATLINE_LOG` env var.
#[must_use]
pub fn parse_log_level_from_env() -> Option<LogLevel> {
    std::env::var(LOG_LEVEL_ENV).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            LogLevel::from_arg(trimmed)
        }
    })
}

/// Initialize logging with the given settings.
pub fn init(level: LogLevel, json: bool, verbose: bool) {
    let level = if verbose && matches!(level, LogLevel::Error) {
        LogLevel::Debug
    } else {
        level
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chatline={}", level.as_filter())));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_writer(std::io::stderr)
            .try_init()
            .ok();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init()
            .ok();
    }
}
