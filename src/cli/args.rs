//! CLI argument definitions using clap.
//!
//! Actions are mutually exclusive; exactly one executes per invocation.
//! The historical short flags (`-lm`, `-ch`, `-dm`, `-vh`) predate this
//! implementation and are longer than clap's single-character shorts allow,
//! so [`normalize`] rewrites them to their long forms before parsing.

use clap::{ArgGroup, Parser};

use crate::core::config::{
    self, Config, DEFAULT_API_BASE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};

/// chatline - Command-line ChatGPT client with persistent history.
#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(author, version, about, long_about = None)]
#[command(group = ArgGroup::new("action")
    .args(["message", "last_message", "clear_history", "delete_last_message", "view_history", "prompt"])
    .multiple(false))]
pub struct Cli {
    /// Ask a question; prints the reply and records the exchange
    #[arg(short, long, num_args = 1.., value_name = "TEXT")]
    pub message: Option<Vec<String>>,

    /// Print the last message from the history
    #[arg(long)]
    pub last_message: bool,

    /// Clear the entire message history
    #[arg(long)]
    pub clear_history: bool,

    /// Delete the last message from the history
    #[arg(long)]
    pub delete_last_message: bool,

    /// View the entire message history
    #[arg(long)]
    pub view_history: bool,

    /// Freeform prompt; same as --message
    #[arg(value_name = "PROMPT", trailing_var_arg = true)]
    pub prompt: Vec<String>,

    // === Completion options ===
    /// Model to request
    #[arg(long, env = "CHATLINE_MODEL", default_value = DEFAULT_MODEL, value_name = "MODEL")]
    pub model: String,

    /// API credential
    #[arg(long, env = config::API_KEY_ENV, hide_env_values = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Chat completions endpoint
    #[arg(long, env = "CHATLINE_API_BASE", default_value = DEFAULT_API_BASE, value_name = "URL")]
    pub api_base: String,

    /// Sampling temperature
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE, value_name = "TEMP")]
    pub temperature: f64,

    /// Completion token budget
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS, value_name = "N")]
    pub max_tokens: u32,

    // === Global flags ===
    /// Log level
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit JSON logs to stderr
    #[arg(long)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// The single action selected by a CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send a prompt, print the reply, record both messages.
    Ask(String),
    /// Print the last message.
    LastMessage,
    /// Empty the history.
    ClearHistory,
    /// Remove the last message.
    DeleteLastMessage,
    /// Print all messages in order.
    ViewHistory,
    /// No action given; show the quickstart screen.
    Quickstart,
}

impl Cli {
    /// Resolve which action this invocation selected.
    #[must_use]
    pub fn action(&self) -> Action {
        if let Some(words) = &self.message {
            return Action::Ask(words.join(" "));
        }
        if self.last_message {
            return Action::LastMessage;
        }
        if self.clear_history {
            return Action::ClearHistory;
        }
        if self.delete_last_message {
            return Action::DeleteLastMessage;
        }
        if self.view_history {
            return Action::ViewHistory;
        }
        if !self.prompt.is_empty() {
            return Action::Ask(self.prompt.join(" "));
        }
        Action::Quickstart
    }

    /// Build the completion configuration for this invocation.
    #[must_use]
    pub fn to_config(&self) -> Config {
        Config {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            api_base: self.api_base.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Rewrite the historical multi-character short flags to their long forms.
///
/// Everything else passes through untouched, so `--last-message` and friends
/// keep working as clap defines them.
pub fn normalize<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| {
            match arg.as_str() {
                "-lm" => "--last-message",
                "-ch" => "--clear-history",
                "-dm" => "--delete-last-message",
                "-vh" => "--view-history",
                _ => return arg,
            }
            .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let mut full = vec!["chatline".to_string()];
        full.extend(args.iter().map(ToString::to_string));
        Cli::try_parse_from(normalize(full))
    }

    #[test]
    fn cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn message_flag_selects_ask() {
        let cli = parse(&["-m", "what", "is", "rust"]).expect("parse");
        assert_eq!(cli.action(), Action::Ask("what is rust".to_string()));
    }

    #[test]
    fn bare_words_select_ask() {
        let cli = parse(&["what", "is", "rust"]).expect("parse");
        assert_eq!(cli.action(), Action::Ask("what is rust".to_string()));
    }

    #[test]
    fn no_arguments_selects_quickstart() {
        let cli = parse(&[]).expect("parse");
        assert_eq!(cli.action(), Action::Quickstart);
    }

    #[test]
    fn legacy_short_flags_are_normalized() {
        assert_eq!(
            parse(&["-lm"]).expect("parse").action(),
            Action::LastMessage
        );
        assert_eq!(
            parse(&["-ch"]).expect("parse").action(),
            Action::ClearHistory
        );
        assert_eq!(
            parse(&["-dm"]).expect("parse").action(),
            Action::DeleteLastMessage
        );
        assert_eq!(
            parse(&["-vh"]).expect("parse").action(),
            Action::ViewHistory
        );
    }

    #[test]
    fn actions_are_mutually_exclusive() {
        assert!(parse(&["-m", "hello", "--clear-history"]).is_err());
        assert!(parse(&["-vh", "-lm"]).is_err());
        assert!(parse(&["--view-history", "stray", "prompt"]).is_err());
    }

    #[test]
    fn normalize_leaves_long_flags_alone() {
        let args = vec![
            "chatline".to_string(),
            "--view-history".to_string(),
            "--no-color".to_string(),
        ];
        assert_eq!(normalize(args.clone()), args);
    }

    #[test]
    fn config_reflects_completion_flags() {
        let cli = parse(&[
            "-m",
            "hi",
            "--model",
            "gpt-4o",
            "--temperature",
            "0.2",
            "--max-tokens",
            "128",
        ])
        .expect("parse");

        let config = cli.to_config();
        assert_eq!(config.model, "gpt-4o");
        assert!((config.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.max_tokens, 128);
    }
}
