//! chatline - Command-line ChatGPT client
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use chatline::cli::{self, Action, Cli, args};
use chatline::core::logging;
use chatline::storage::paths::AppPaths;
use chatline::storage::HistoryStore;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(args::normalize(std::env::args()));

    // Initialize logging
    let log_level = cli
        .log_level
        .as_deref()
        .and_then(logging::LogLevel::from_arg)
        .or_else(logging::parse_log_level_from_env)
        .unwrap_or_default();
    logging::init(log_level, cli.json_output, cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Execute command
    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{} {e}", "[-]".red().bold());
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: Cli) -> chatline::Result<()> {
    let action = cli.action();

    if action == Action::Quickstart {
        print_quickstart();
        return Ok(());
    }

    let paths = AppPaths::new();
    let store = HistoryStore::open(&paths.history_db_file())?;

    match action {
        Action::Ask(prompt) => {
            let config = cli.to_config();
            cli::ask::execute(&prompt, &config, &store).await
        }
        Action::LastMessage => cli::history::last_message(&store),
        Action::ClearHistory => cli::history::clear(&store),
        Action::DeleteLastMessage => cli::history::delete_last(&store),
        Action::ViewHistory => cli::history::view(&store),
        Action::Quickstart => unreachable!("handled above"),
    }
}

/// Print quickstart help when no action is given.
fn print_quickstart() {
    println!(
        r#"chatline - Command-line ChatGPT client

Ask a question and keep the conversation in a local history.

USAGE:
    chatline [OPTIONS] [PROMPT]...

QUICK START:
    chatline what is borrowing in rust    # Freeform prompt
    chatline -m "explain lifetimes"       # Same, via flag
    chatline -lm                          # Show the last message
    chatline -vh                          # View the whole history
    chatline -dm                          # Delete the last message
    chatline -ch                          # Clear the history

SETUP:
    export OPENAI_API_KEY=sk-...

For more help: chatline --help
"#
    );

    println!("Version: {}", env!("CARGO_PKG_VERSION"));
}
