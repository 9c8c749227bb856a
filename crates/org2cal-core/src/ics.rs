//! iCalendar rendering of clock intervals.
//!
//! The document layout is fixed: a four-line header, one `VEVENT` block per
//! exported interval, then a one-line footer. Events appear in document order
//! (heading, then interval within heading); they are never sorted by date.
//! Field order inside a block is kept stable so output stays byte-compatible
//! across releases.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::dates::DateSet;
use crate::error::ConvertError;
use crate::outline::{ClockInterval, OutlineTree};

/// Timezone label used for `DTSTART`/`DTEND` unless configured otherwise.
pub const DEFAULT_TIMEZONE: &str = "US-Eastern";

/// Lines opening every calendar document.
pub const CALENDAR_HEADER: &str = "BEGIN:VCALENDAR\n\
VERSION:2.0\n\
PRODID:-//Veggente//EN\n\
CALSCALE:GREGORIAN\n";

/// Line closing every calendar document.
pub const CALENDAR_FOOTER: &str = "END:VCALENDAR\n";

/// Separator between headings in an event description.
const LINEAGE_SEPARATOR: &str = " -> ";

/// Renders a timestamp as ISO 8601 with hyphens and colons removed.
///
/// `2020-08-17T09:30:00` becomes `20200817T093000`.
pub fn compact_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y%m%dT%H%M%S").to_string()
}

/// Formats one interval as a `VEVENT` block.
///
/// `ancestors` is the heading chain, outermost first; its last element is the
/// summary. An empty chain yields an empty summary and description.
pub fn format_event(interval: &ClockInterval, ancestors: &[String], timezone: &str) -> String {
    let summary = ancestors.last().map_or("", String::as_str);
    format!(
        "BEGIN:VEVENT\n\
         DTEND;TZID={timezone}:{end}\n\
         SUMMARY:{summary}\n\
         DESCRIPTION:{description}\n\
         DTSTART;TZID={timezone}:{start}\n\
         END:VEVENT\n",
        end = compact_timestamp(interval.end),
        description = ancestors.join(LINEAGE_SEPARATOR),
        start = compact_timestamp(interval.start),
    )
}

/// Streams the calendar for `tree` filtered by `dates` into `writer`.
///
/// Returns the number of events written.
pub fn write_calendar<W: Write>(
    writer: &mut W,
    tree: &OutlineTree,
    dates: &DateSet,
    timezone: &str,
) -> io::Result<usize> {
    writer.write_all(CALENDAR_HEADER.as_bytes())?;

    let mut written = 0;
    for node in tree.headings() {
        for interval in node.clocks() {
            if !dates.contains(interval.start_date()) {
                continue;
            }
            let block = format_event(interval, node.ancestor_headings(), timezone);
            writer.write_all(block.as_bytes())?;
            written += 1;
            tracing::debug!(
                heading = node.heading(),
                start = %interval.start,
                "wrote event"
            );
        }
    }

    writer.write_all(CALENDAR_FOOTER.as_bytes())?;
    Ok(written)
}

/// Writes the calendar to `output`, creating or truncating the file.
///
/// A failure part-way through leaves a truncated file behind; callers must
/// not consume it.
pub fn export_clock(
    tree: &OutlineTree,
    dates: &DateSet,
    output: &Path,
    timezone: &str,
) -> Result<usize, ConvertError> {
    let file = File::create(output).map_err(|e| ConvertError::file_access(output, e))?;
    let mut writer = BufWriter::new(file);

    let written = write_calendar(&mut writer, tree, dates, timezone)
        .map_err(|e| ConvertError::file_access(output, e))?;
    writer
        .flush()
        .map_err(|e| ConvertError::file_access(output, e))?;

    Ok(written)
}
