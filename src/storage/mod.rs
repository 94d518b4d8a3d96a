//! Persistent storage: the conversation history database and its paths.

pub mod history;
pub mod history_schema;
pub mod paths;

pub use history::HistoryStore;
