//! daily-todo - a per-day markdown task log
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use daily_todo::config::{todo_home, Config};
use daily_todo::error::exit_codes;
use daily_todo::generator::OpenAiGenerator;
use daily_todo::storage::FileDayStore;

// =============================================================================
// CLI Definition
// =============================================================================

/// daily-todo - a per-day markdown task log
#[derive(Parser)]
#[command(name = "daily-todo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, short, global = true)]
    json: bool,
    /// Suppress output
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the day's tasks from the previous day's unfinished ones
    Generate {
        /// Day to generate (YYYY-MM-DD, default today)
        #[arg(long, short)]
        date: Option<NaiveDate>,
    },

    /// Show the day's tasks and their status
    List {
        /// Day to list (YYYY-MM-DD, default today)
        #[arg(long, short)]
        date: Option<NaiveDate>,
    },

    /// Apply a natural-language change, e.g. "finish 1, add write report"
    Update {
        /// What to change
        message: String,
        /// Day to update (YYYY-MM-DD, default today)
        #[arg(long, short)]
        date: Option<NaiveDate>,
    },

    /// Summarize a day (written to the file) or the week ending at a day
    Summary {
        /// daily or weekly
        #[arg(default_value = "daily")]
        kind: String,
        /// Day to summarize, or the last day of the week (YYYY-MM-DD, default today)
        #[arg(long, short)]
        date: Option<NaiveDate>,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("daily-todo error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.daily-todo/crash.log and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("daily-todo panic: {}", info);

        if let Some(home) = todo_home() {
            let crash_log = home.join("crash.log");
            let _ = std::fs::create_dir_all(&home);
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Send log events to stderr, filtered by `DAILY_TODO_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("DAILY_TODO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    let today = chrono::Local::now().date_naive();
    let (json, quiet) = (cli.json, cli.quiet);

    match cli.command {
        Commands::Generate { date } => run_generate(date.unwrap_or(today), json, quiet, &cwd),
        Commands::List { date } => run_list(date.unwrap_or(today), json, quiet, &cwd),
        Commands::Update { message, date } => {
            run_update(date.unwrap_or(today), &message, json, quiet, &cwd)
        }
        Commands::Summary { kind, date } => {
            run_summary(&kind, date.unwrap_or(today), json, quiet, &cwd)
        }
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

/// Print a formatted command output: stdout on success or in JSON mode,
/// stderr otherwise.
fn emit(formatted: &str, success: bool, json: bool) {
    if formatted.is_empty() {
        return;
    }
    if success || json {
        print!("{}", formatted);
        if json {
            println!();
        }
    } else {
        eprint!("{}", formatted);
    }
}

fn run_generate(
    date: NaiveDate,
    json: bool,
    quiet: bool,
    cwd: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use daily_todo::cli::generate::{GenerateCommand, GenerateOptions};

    let config = Config::load_from_cwd(cwd);
    let generator = OpenAiGenerator::from_config(&config.llm)?;
    let store = FileDayStore::from_config(&config, cwd);

    let cmd = GenerateCommand::new(store, generator, config);
    let options = GenerateOptions { json, quiet };

    let output = cmd.run(date, &options);
    emit(&cmd.format_output(&output, &options), output.success, json);

    Ok(success_to_exit_code(output.success))
}

fn run_list(
    date: NaiveDate,
    json: bool,
    quiet: bool,
    cwd: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use daily_todo::cli::list::{ListCommand, ListOptions};

    let config = Config::load_from_cwd(cwd);
    let store = FileDayStore::from_config(&config, cwd);

    let cmd = ListCommand::new(store, config);
    let options = ListOptions { json, quiet };

    let output = cmd.run(date, &options);
    emit(&cmd.format_output(&output, &options), output.success, json);

    Ok(success_to_exit_code(output.success))
}

fn run_update(
    date: NaiveDate,
    message: &str,
    json: bool,
    quiet: bool,
    cwd: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use daily_todo::cli::update::{UpdateCommand, UpdateOptions};

    let config = Config::load_from_cwd(cwd);
    let generator = OpenAiGenerator::from_config(&config.llm)?;
    let store = FileDayStore::from_config(&config, cwd);

    let cmd = UpdateCommand::new(store, generator, config);
    let options = UpdateOptions { json, quiet };

    let output = cmd.run(date, message, &options);
    emit(&cmd.format_output(&output, &options), output.success, json);

    Ok(success_to_exit_code(output.success))
}

fn run_summary(
    kind: &str,
    date: NaiveDate,
    json: bool,
    quiet: bool,
    cwd: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use daily_todo::cli::summary::{SummaryCommand, SummaryKind, SummaryOptions};

    // Reject an unknown kind before asking for credentials.
    let kind: SummaryKind = kind.parse()?;

    let config = Config::load_from_cwd(cwd);
    let generator = OpenAiGenerator::from_config(&config.llm)?;
    let store = FileDayStore::from_config(&config, cwd);

    let cmd = SummaryCommand::new(store, generator, config);
    let options = SummaryOptions { json, quiet };

    let output = cmd.run(kind, date, &options);
    emit(&cmd.format_output(&output, &options), output.success, json);

    Ok(success_to_exit_code(output.success))
}
