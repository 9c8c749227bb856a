//! Implementation of the `org2cal export` command.
//!
//! Resolves the requested dates and default paths, then writes the clock
//! entries of the source outline to an iCalendar file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use org2cal_core::clock_report;

use super::util::resolve_dates;
use crate::Config;
use crate::cli::ExportArgs;

/// Summary printed after a successful export.
#[derive(Debug, Serialize)]
pub struct ExportSummary {
    pub source: PathBuf,
    pub output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_date: Option<NaiveDate>,
    pub days: usize,
    pub events: usize,
}

/// Run the export command.
pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    args: &ExportArgs,
    today: NaiveDate,
) -> Result<()> {
    let dates = resolve_dates(args, today)?;
    let options = config.report_options(
        args.source.as_deref(),
        args.output.as_deref(),
        args.timezone.as_deref(),
    )?;
    tracing::debug!(?options, days = dates.len(), "resolved export");

    let events = clock_report(&options, &dates).with_context(|| {
        format!(
            "failed to export {} to {}",
            options.source.display(),
            options.output.display()
        )
    })?;

    let bounds = dates.bounds();
    let summary = ExportSummary {
        source: options.source,
        output: options.output,
        first_date: bounds.map(|(first, _)| first),
        last_date: bounds.map(|(_, last)| last),
        days: dates.len(),
        events,
    };

    if args.json {
        serde_json::to_writer_pretty(&mut *writer, &summary)
            .context("failed to serialize summary")?;
        writeln!(writer)?;
    } else {
        write!(writer, "{}", format_summary(&summary))?;
    }

    Ok(())
}

fn format_summary(summary: &ExportSummary) -> String {
    let noun = if summary.events == 1 { "event" } else { "events" };
    let range = match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) if first == last => format!(" for {first}"),
        (Some(first), Some(last)) => format!(" for {first}..{last}"),
        _ => String::new(),
    };
    format!(
        "Wrote {} {noun}{range} to {}\n",
        summary.events,
        summary.output.display()
    )
}
