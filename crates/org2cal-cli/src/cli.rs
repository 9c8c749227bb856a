//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Export org-mode clock entries to an iCalendar file.
///
/// Reads the CLOCK lines logged under each heading and writes one calendar
/// event per entry whose start date falls in the requested range.
#[derive(Debug, Parser)]
#[command(name = "org2cal", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export clock entries for a date range.
    Export(ExportArgs),

    /// Show or change the saved defaults.
    #[command(subcommand)]
    Config(ConfigAction),
}

/// Arguments for `org2cal export`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ExportArgs {
    /// First date to export (today, yesterday, 'N days ago', or YYYY-M-D).
    #[arg(short, long, conflicts_with = "date")]
    pub start: Option<String>,

    /// Last date to export, inclusive. Defaults to today.
    #[arg(short, long, conflicts_with = "date")]
    pub end: Option<String>,

    /// Export a single date. May be repeated.
    #[arg(short, long)]
    pub date: Vec<String>,

    /// Org file to read. Defaults to the configured source.
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Calendar file to write. Defaults to the configured output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Timezone label for event times.
    #[arg(long)]
    pub timezone: Option<String>,

    /// Output the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Save default paths and timezone to the user config file.
    Set {
        /// Default org file to read.
        #[arg(long)]
        source: Option<PathBuf>,

        /// Default calendar file to write.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Default timezone label.
        #[arg(long)]
        timezone: Option<String>,
    },
}
