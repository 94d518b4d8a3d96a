//! History management actions: view, last, delete-last, clear.
//!
//! These actions never construct an HTTP client. Viewing an empty history
//! is informational and succeeds; asking for or deleting the last message
//! of an empty history is an [`crate::error::ChatlineError::EmptyHistory`]
//! failure.

use colored::Colorize;

use crate::core::models::{Role, StoredMessage};
use crate::error::Result;
use crate::storage::HistoryStore;

const SEPARATOR: &str = "-------------------";

/// Print the last message.
///
/// # Errors
/// Returns `EmptyHistory` when the store is empty.
pub fn last_message(store: &HistoryStore) -> Result<()> {
    let message = store.read_last()?;
    print_message(&message);
    Ok(())
}

/// Print all messages in append order.
///
/// An empty history prints an explanatory line and succeeds.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn view(store: &HistoryStore) -> Result<()> {
    let messages = store.read_all()?;
    if messages.is_empty() {
        println!("History is empty.");
        return Ok(());
    }

    for message in &messages {
        println!("{}", SEPARATOR.bold());
        print_message(message);
    }
    println!("{}", SEPARATOR.bold());

    Ok(())
}

/// Remove the last message.
///
/// # Errors
/// Returns `EmptyHistory` when there is nothing to delete.
pub fn delete_last(store: &HistoryStore) -> Result<()> {
    store.delete_last()?;
    println!("Last message deleted.");
    Ok(())
}

/// Empty the history. Succeeds even when already empty.
///
/// # Errors
/// Returns an error if the store cannot be written.
pub fn clear(store: &HistoryStore) -> Result<()> {
    store.clear()?;
    println!("Message history cleared.");
    Ok(())
}

fn print_message(message: &StoredMessage) {
    let label = match message.role {
        Role::User => "> You:".bright_green().bold(),
        Role::Assistant => "> Answer:".bright_yellow().bold(),
    };
    let timestamp = message.created_at.format("%Y-%m-%d %H:%M:%S");
    println!("{label} {}", timestamp.to_string().dimmed());
    println!("{}", message.content);
}
