//! # taskreport
//!
//! Command-line front end for the date-range task reporter.
//!
//! ## Usage
//!
//! ```bash
//! # Report for one week from exported task lists
//! taskreport generate --start 2024-01-15 --end 2024-01-21 \
//!     --tasks tasks.json --archive archive.json --notes
//!
//! # Save it while printing
//! taskreport generate --start 2024-01-15 --end 2024-01-21 --tasks tasks.json --save "Week 3"
//!
//! # Saved reports
//! taskreport list
//! taskreport show <ID>
//! taskreport delete <ID> [<ID>...]
//!
//! # Defaults for --notes / --exclude-empty
//! taskreport prefs --notes true --exclude-empty false
//! ```
//!
//! Saved reports live in `~/.local/share/taskreport/reports.json` (or the
//! platform equivalent); set `REPORTS_DB` to use another file. Log output is
//! controlled with `TASKREPORT_LOG` (e.g. `TASKREPORT_LOG=debug`).

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use taskreport::commands::*;
use taskreport::storage::ReportStore;

#[derive(Parser)]
#[command(name = "taskreport")]
#[command(about = "Date-range activity reports from task exports", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a report for a date range
    Generate {
        /// First day, YYYY-MM-DD
        #[arg(short, long)]
        start: String,
        /// Last day (inclusive), YYYY-MM-DD
        #[arg(short, long)]
        end: String,
        /// JSON export of active tasks (repeatable)
        #[arg(short, long = "tasks", required = true)]
        tasks: Vec<PathBuf>,
        /// JSON export of archived tasks (repeatable)
        #[arg(short, long)]
        archive: Vec<PathBuf>,
        /// Include task notes
        #[arg(short, long, num_args = 0..=1, default_missing_value = "true")]
        #[arg(action = ArgAction::Set)]
        notes: Option<bool>,
        /// Leave out dates without tasks
        #[arg(short = 'x', long, num_args = 0..=1, default_missing_value = "true")]
        #[arg(action = ArgAction::Set)]
        exclude_empty: Option<bool>,
        /// Save the report under this name
        #[arg(long)]
        save: Option<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved reports
    List,
    /// Print a saved report
    Show {
        id: String,
    },
    /// Delete saved reports
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show or update report defaults
    Prefs {
        /// Include notes by default
        #[arg(long)]
        notes: Option<bool>,
        /// Exclude empty dates by default
        #[arg(long)]
        exclude_empty: Option<bool>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("TASKREPORT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate { start, end, tasks, archive, notes, exclude_empty, save, json } => {
            let mut store = ReportStore::open_default();
            let opts = GenerateOptions {
                start,
                end,
                tasks,
                archive,
                include_notes: notes,
                exclude_empty_dates: exclude_empty,
                save,
                json,
            };
            cmd_generate(opts, &mut store, false).map(|_| ())
        }
        Commands::List => {
            cmd_list(&ReportStore::open_default());
            Ok(())
        }
        Commands::Show { id } => cmd_show(&ReportStore::open_default(), &id),
        Commands::Delete { ids } => {
            cmd_delete(&mut ReportStore::open_default(), &ids, false).map(|_| ())
        }
        Commands::Prefs { notes, exclude_empty } => {
            cmd_prefs(&mut ReportStore::open_default(), notes, exclude_empty, false).map(|_| ())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "taskreport", &mut io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
