use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tasketo_core::{CalendarSystem, CoreError, Language, SortKey, TaskFilter, Zone};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tasketo",
    version,
    about = "Query a task snapshot under the Gregorian or Solar Hijri calendar"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Engine config file (defaults to $TASKETO_CONFIG or the user config dir).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Time zone: an IANA name or a fixed offset such as +03:30.
    #[arg(long = "tz", global = true, value_parser = parse_zone)]
    pub zone: Option<Zone>,

    #[arg(long = "calendar", global = true, value_parser = parse_calendar)]
    pub calendar: Option<CalendarSystem>,

    #[arg(long = "lang", global = true, value_parser = parse_language)]
    pub language: Option<Language>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search, filter and sort a JSON task snapshot.
    List {
        #[arg(long = "file")]
        file: PathBuf,

        #[arg(long = "search", default_value = "")]
        search: String,

        #[arg(long = "filter", default_value = "all", value_parser = parse_filter)]
        filter: TaskFilter,

        #[arg(long = "sort", default_value = "due", value_parser = parse_sort)]
        sort: SortKey,
    },
    /// Show the snapshot as status columns.
    Board {
        #[arg(long = "file")]
        file: PathBuf,

        #[arg(long = "search", default_value = "")]
        search: String,
    },
    /// Resolve a date expression and print it under both calendars.
    Date {
        /// e.g. tomorrow, +3d, 1403/01/01 09:30
        expr: String,
    },
}

fn parse_zone(raw: &str) -> Result<Zone, CoreError> {
    raw.parse()
}

fn parse_calendar(raw: &str) -> Result<CalendarSystem, CoreError> {
    raw.parse()
}

fn parse_language(raw: &str) -> Result<Language, CoreError> {
    raw.parse()
}

fn parse_filter(raw: &str) -> Result<TaskFilter, CoreError> {
    raw.parse()
}

fn parse_sort(raw: &str) -> Result<SortKey, CoreError> {
    raw.parse()
}

/// Quiet flags win over verbose ones.
fn default_level(verbose: u8, quiet: u8) -> &'static str {
    match (quiet, verbose) {
        (2.., _) => "error",
        (1, _) | (0, 0) => "warn",
        (0, 1) => "info",
        (0, 2) => "debug",
        (0, _) => "trace",
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = default_level(verbose, quiet);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
