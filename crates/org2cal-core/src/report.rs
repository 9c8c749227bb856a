//! One-shot clock report: load an outline, write its calendar.

use std::path::PathBuf;

use crate::dates::DateSet;
use crate::error::ConvertError;
use crate::ics::{self, DEFAULT_TIMEZONE};
use crate::outline;

/// Resolved inputs for a clock report.
///
/// Callers build this from whatever configuration they keep; the library
/// never reads configuration on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Outline document to read.
    pub source: PathBuf,
    /// Calendar file to create or overwrite.
    pub output: PathBuf,
    /// `TZID` label stamped on every event.
    pub timezone: String,
}

impl ReportOptions {
    /// Options using [`DEFAULT_TIMEZONE`].
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

/// Exports the clock entries of `options.source` whose start date is in
/// `dates` to `options.output`.
///
/// Returns the number of events written. The source is fully loaded before
/// the output is opened, so a malformed outline never truncates an existing
/// calendar.
pub fn clock_report(options: &ReportOptions, dates: &DateSet) -> Result<usize, ConvertError> {
    let tree = outline::load(&options.source)?;
    let written = ics::export_clock(&tree, dates, &options.output, &options.timezone)?;

    tracing::info!(
        source = %options.source.display(),
        output = %options.output.display(),
        dates = dates.len(),
        events = written,
        "clock report written"
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const LOG: &str = "\
* Project A
** Task 1
   CLOCK: [2020-08-17 Mon 09:00]--[2020-08-17 Mon 10:30] =>  1:30
";

    fn setup() -> (tempfile::TempDir, ReportOptions) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("log.org");
        std::fs::write(&source, LOG).unwrap();
        let options = ReportOptions::new(source, dir.path().join("out.ics"));
        (dir, options)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn matching_date_writes_one_event() {
        let (_dir, options) = setup();

        let written = clock_report(&options, &DateSet::single(date(2020, 8, 17))).unwrap();

        let content = std::fs::read_to_string(&options.output).unwrap();
        assert_eq!(written, 1);
        assert!(content.contains("SUMMARY:Task 1\n"));
        assert!(content.contains("DESCRIPTION:Project A -> Task 1\n"));
        assert!(content.contains("DTSTART;TZID=US-Eastern:20200817T090000\n"));
        assert!(content.contains("DTEND;TZID=US-Eastern:20200817T103000\n"));
    }

    #[test]
    fn other_date_writes_empty_calendar() {
        let (_dir, options) = setup();

        let written = clock_report(&options, &DateSet::single(date(2020, 8, 18))).unwrap();

        let content = std::fs::read_to_string(&options.output).unwrap();
        assert_eq!(written, 0);
        assert_eq!(
            content,
            format!("{}{}", ics::CALENDAR_HEADER, ics::CALENDAR_FOOTER)
        );
    }

    #[test]
    fn configured_timezone_is_used() {
        let (_dir, mut options) = setup();
        options.timezone = "Europe/Berlin".to_string();

        clock_report(&options, &DateSet::single(date(2020, 8, 17))).unwrap();

        let content = std::fs::read_to_string(&options.output).unwrap();
        assert!(content.contains("DTSTART;TZID=Europe/Berlin:20200817T090000\n"));
    }

    #[test]
    fn malformed_source_leaves_existing_output_untouched() {
        let (_dir, options) = setup();
        std::fs::write(
            &options.source,
            "* Task\nCLOCK: [2020-02-30 Sun 09:00]--[2020-02-30 Sun 10:00]\n",
        )
        .unwrap();
        std::fs::write(&options.output, "previous").unwrap();

        let err = clock_report(&options, &DateSet::single(date(2020, 2, 28))).unwrap_err();

        assert!(matches!(err, ConvertError::MalformedTimestamp { line: 2, .. }));
        assert_eq!(std::fs::read_to_string(&options.output).unwrap(), "previous");
    }

    #[test]
    fn missing_source_is_file_access_error() {
        let (dir, mut options) = setup();
        options.source = dir.path().join("absent.org");

        let err = clock_report(&options, &DateSet::default()).unwrap_err();
        assert!(matches!(err, ConvertError::FileAccess { .. }));
    }
}
