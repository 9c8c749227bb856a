//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{Days, Local, NaiveDate};
use regex::Regex;

use org2cal_core::DateSet;

use crate::cli::ExportArgs;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Explicit date with optional zero padding, e.g. `2020-8-7`.
static EXPLICIT_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap());

/// Conservative bound for relative dates (~1000 years).
const MAX_RELATIVE_DAYS: u64 = 1000 * 366;

/// Today's date in the local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a date expression relative to `today`.
///
/// Supports:
/// - Keywords: "today", "yesterday"
/// - Relative: "3 days ago", "1 week ago"
/// - Explicit: "2020-08-17", "2020-8-7"
pub fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => return days_before(today, 1),
        _ => {}
    }

    if let Some(caps) = EXPLICIT_DATE_RE.captures(s) {
        let year: i32 = caps[1].parse().context("failed to parse year")?;
        let month: u32 = caps[2].parse().context("failed to parse month")?;
        let day: u32 = caps[3].parse().context("failed to parse day")?;
        return NaiveDate::from_ymd_opt(year, month, day)
            .with_context(|| format!("Invalid date: {s} is not a calendar day"));
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
        anyhow::bail!(
            "Invalid date: {s}. Use today, yesterday, YYYY-M-D (e.g., 2020-8-17) or relative (e.g., '3 days ago')"
        );
    };

    let n: u64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    let days = match &caps[2] {
        "day" => n,
        "week" => n.saturating_mul(7),
        unit => anyhow::bail!("Unknown date unit: {unit}"),
    };

    if days > MAX_RELATIVE_DAYS {
        anyhow::bail!("Relative date too far back: {s}");
    }

    days_before(today, days)
}

fn days_before(today: NaiveDate, days: u64) -> anyhow::Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(days))
        .with_context(|| format!("date out of range: {days} days before {today}"))
}

/// Resolve the dates selected by `export` arguments.
///
/// Repeated `--date` values form the set directly. Otherwise the inclusive
/// range `--start..--end` is used, where a missing start means the end date
/// and a missing end means today.
pub fn resolve_dates(args: &ExportArgs, today: NaiveDate) -> anyhow::Result<DateSet> {
    if !args.date.is_empty() {
        return args.date.iter().map(|d| parse_date(d, today)).collect();
    }

    let end = args
        .end
        .as_deref()
        .map_or(Ok(today), |e| parse_date(e, today))?;
    let start = args
        .start
        .as_deref()
        .map_or(Ok(end), |s| parse_date(s, today))?;

    if start > end {
        tracing::warn!(%start, %end, "start date is after end date; nothing will be exported");
    }
    Ok(DateSet::from_range(start, end))
}
