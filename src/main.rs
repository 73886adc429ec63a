//! # Tasklet
//!
//! A small terminal task list. Add short tasks with an optional due date,
//! tick them off, filter the view, and delete them one by one or all at once.
//! The list survives restarts.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive mode
//! tasklet
//!
//! # Scriptable mode
//! tasklet add "Buy milk" --date 2024-01-01
//! tasklet list --filter incomplete
//! tasklet toggle <ID>
//! tasklet remove <ID>
//! tasklet clear
//! ```
//!
//! ## Data Storage
//!
//! Tasks are saved as a JSON array under the `todos` key of
//! `~/.local/share/tasklet/storage.json` (Linux). Set `TASKLET_DB` to use
//! another file, or `TASKLET_CONFIG` to point at a `config.toml`.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process::ExitCode;

use tasklet::commands::*;
use tasklet::config::Config;
use tasklet::logging;
use tasklet::models::Filter;
use tasklet::tui::run_tui;

#[derive(Parser)]
#[command(name = "tasklet")]
#[command(about = "Simple terminal task list", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task description (quoted if it has spaces)
        text: String,
        /// Due date, stored as given
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List tasks in the order they were added
    List {
        /// Which tasks to show
        #[arg(short, long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
    },
    /// Toggle a task between complete and incomplete
    Toggle {
        id: u64,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Delete all tasks
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Some(Commands::Add { text, date }) => { logging::init_stderr(); cmd_add(text, date, false) }
        Some(Commands::List { filter }) => { logging::init_stderr(); cmd_list(filter) }
        Some(Commands::Toggle { id }) => { logging::init_stderr(); cmd_toggle(id, false) }
        Some(Commands::Remove { id }) => { logging::init_stderr(); cmd_remove(id, false) }
        Some(Commands::Clear { force }) => { logging::init_stderr(); cmd_clear(force, false) }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "tasklet", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Ui) | None => {
            let _guard = logging::init_file();
            if let Err(e) = run_tui(&Config::load()) {
                eprintln!("Error running TUI: {}", e);
                return ExitCode::FAILURE;
            }
            Ok(())
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
