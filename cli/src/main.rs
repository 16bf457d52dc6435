mod report;
mod tui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use workhours_core::{
    entries_in_month, parse_month, AppConfig, EntryForm, EntryRepository, LoadState, Submission,
    Tracker, TrackerError, WorkEntry, YearMonth,
};

const LOG_FILE_NAME: &str = "workhours.log";
const LOG_ENV: &str = "WORKHOURS_LOG";

type Store = Box<dyn EntryRepository>;

#[derive(Parser)]
#[command(name = "workhours")]
#[command(about = "Record work shifts and see what each month pays", long_about = None)]
struct Cli {
    /// Config file (default: ~/.workhours/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory for the local entry file and the log
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Keep entries in memory only
    #[arg(long, global = true)]
    ephemeral: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Record a shift (usage: add Calma date:sat hours:4)
    Add {
        /// Workplace name followed by date:<when> and hours:<n>
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List recorded shifts for a month
    List {
        /// YYYY-MM, "this" or "last"
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Hours and pay per workplace for a month
    Summary {
        /// YYYY-MM, "this" or "last"
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Months that have recorded shifts
    Months,
    /// Configured workplaces and their rates
    Workplaces,
    /// Open the Terminal User Interface
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    let command = cli.command.unwrap_or(Commands::Tui);
    init_logging(&config, matches!(command, Commands::Tui))?;

    let registry = config.registry()?;
    if matches!(command, Commands::Workplaces) {
        report::show_workplaces(&registry);
        return Ok(());
    }

    let store = config.open_repository(cli.ephemeral)?;
    let mut tracker = Tracker::new(registry, store);
    let today = Local::now().date_naive();

    match command {
        Commands::Add { args } => {
            if args.is_empty() {
                println!("Error: Workplace is required.");
                return Ok(());
            }
            sign_in(&mut tracker)?;
            if let LoadState::Failed(reason) = tracker.load_state() {
                // A one-shot add would overwrite the stored file with a single entry.
                return Err(anyhow!("Refusing to add while stored entries cannot be read: {}", reason));
            }

            let form = match EntryForm::from_args(&args, tracker.registry()) {
                Ok(form) => form,
                Err(e) => {
                    println!("Error: {}", e);
                    return Ok(());
                }
            };

            match tracker.submit(&form, today) {
                Ok(Submission::Saved(entry)) => {
                    println!(
                        "Shift added: {} on {} ({}), {} h (ID: {})",
                        entry.workplace,
                        entry.date,
                        entry.date.format("%a"),
                        entry.hours,
                        entry.id
                    );
                }
                Ok(Submission::Unsaved { entry, error }) => {
                    println!("Warning: shift {} was not saved: {}", entry.id, error);
                }
                Err(TrackerError::Validation(e)) => {
                    println!("Error: {}", e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::List { month } => {
            let month = resolve_month(month.as_deref(), today)?;
            sign_in(&mut tracker)?;
            let entries = loaded_entries(&tracker)?;
            report::show_entries(&entries_in_month(entries, month), month);
        }
        Commands::Summary { month } => {
            let month = resolve_month(month.as_deref(), today)?;
            sign_in(&mut tracker)?;
            let summary = tracker.summary(month).ok_or(TrackerError::NotLoaded)?;
            report::show_summary(&summary);
        }
        Commands::Months => {
            sign_in(&mut tracker)?;
            let months = tracker.months().ok_or(TrackerError::NotLoaded)?;
            report::show_months(&months);
        }
        Commands::Tui => {
            tui::run(tracker, today)?;
        }
        Commands::Workplaces => {}
    }
    Ok(())
}

/// Signs in and surfaces a failed load as a warning; the command still runs
/// against the (empty) collection.
fn sign_in(tracker: &mut Tracker<Store>) -> Result<()> {
    tracker.sign_in()?;
    if let Some(banner) = tracker.banner() {
        eprintln!("Warning: {}", banner);
    }
    Ok(())
}

fn loaded_entries(tracker: &Tracker<Store>) -> Result<&[WorkEntry]> {
    tracker.entries().ok_or_else(|| TrackerError::NotLoaded.into())
}

fn resolve_month(input: Option<&str>, today: NaiveDate) -> Result<YearMonth> {
    match input {
        Some(m) => parse_month(m, today),
        None => Ok(YearMonth::of(today)),
    }
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if to_file {
        // The TUI owns the terminal, so logs go to a file.
        let dir = config.data_dir()?;
        fs::create_dir_all(&dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE_NAME))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(io::stderr).init();
    }
    Ok(())
}
