mod commands;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::Settings;

#[derive(Parser)]
#[command(name = "calstore")]
#[command(about = "Keep a deduplicated event calendar and publish it as iCalendar or JSON")]
#[command(version)]
struct Cli {
    /// Use this config file instead of ~/.config/calstore/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use this database file instead of the configured one
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a single event
    AddEvent {
        /// Event name; text after an en-dash (–) is detail and not part of its identity
        #[arg(long)]
        name: String,

        /// Start date (YYYY-MM-DD, or YYYY-MM-DDTHH:MM with --partial-day)
        #[arg(long)]
        start: String,

        /// Last day of the event (YYYY-MM-DD, or YYYY-MM-DDTHH:MM with --partial-day)
        #[arg(long)]
        end: String,

        /// The event has a time of day instead of spanning whole days
        #[arg(long)]
        partial_day: bool,
    },
    /// Export all events as an iCalendar (.ics) file
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Export all events as a JSON backup
    ExportJson {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Import events from a JSON backup, skipping ones that already exist
    ImportJson {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// List stored events in date order
    Events,
    /// Show config file location and effective settings
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logger = logging::init(cli.verbose)?;
    let settings = Settings::load(cli.config.as_deref(), cli.database)?;

    match cli.command {
        Commands::AddEvent {
            name,
            start,
            end,
            partial_day,
        } => commands::add_event::run(&settings, name, start, end, !partial_day),
        Commands::Export { output } => commands::export::run(&settings, &output),
        Commands::ExportJson { output } => commands::export_json::run(&settings, &output),
        Commands::ImportJson { input } => commands::import_json::run(&settings, &input),
        Commands::Events => commands::events::run(&settings),
        Commands::Config => commands::config::run(&settings),
    }
}
