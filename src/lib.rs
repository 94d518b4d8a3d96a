//! chatline - Command-line ChatGPT client with persistent history.
//!
//! Forwards prompts to an OpenAI-compatible chat completion API and keeps a
//! linear conversation history in a local `SQLite` database.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod core;
pub mod error;
pub mod storage;

pub use error::{ChatlineError, ExitCode, Result};
