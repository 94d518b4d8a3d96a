//! The ask action: send a prompt, print the reply, record the exchange.

use colored::Colorize;

use crate::core::completion::ChatClient;
use crate::core::config::Config;
use crate::core::models::{Message, Role, StoredMessage};
use crate::error::{ChatlineError, Result};
use crate::storage::HistoryStore;

/// Send `prompt` to the completion service and record the exchange.
///
/// Prior history is sent as conversation context. The user prompt and the
/// assistant reply are appended only after the service call succeeds; on any
/// failure the store is left exactly as it was.
///
/// # Errors
/// Returns [`ChatlineError::InvalidInput`] for a blank prompt (before any
/// network call), a service error if the completion request fails, or a
/// persistence error if the appends fail.
pub async fn execute(prompt: &str, config: &Config, store: &HistoryStore) -> Result<()> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ChatlineError::InvalidInput(
            "prompt must not be empty".to_string(),
        ));
    }

    let client = ChatClient::new(config)?;

    let mut messages: Vec<Message> = store
        .read_all()?
        .iter()
        .map(StoredMessage::message)
        .collect();
    messages.push(Message::user(prompt));

    let answer = client.complete(&messages).await?;
    if answer.trim().is_empty() {
        // Nothing has been appended yet; reject rather than store a blank turn.
        return Err(ChatlineError::ParseResponse(
            "service returned an empty completion".to_string(),
        ));
    }

    store.append(Role::User, prompt)?;
    store.append(Role::Assistant, &answer)?;

    tracing::debug!(chars = answer.len(), "recorded exchange");

    println!("{}", "> Answer:".bright_yellow().bold());
    println!("{answer}");

    Ok(())
}
