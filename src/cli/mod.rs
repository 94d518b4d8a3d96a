//! Command-line interface: argument parsing and action handlers.

pub mod args;
pub mod ask;
pub mod history;

pub use args::{Action, Cli};
