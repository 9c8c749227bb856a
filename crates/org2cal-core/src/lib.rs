//! Core conversion logic for org2cal.
//!
//! This crate turns the `CLOCK:` entries of an org outline into an iCalendar
//! document:
//! - Outline: parsing headings and their clock logs into a tree
//! - Dates: the set of days selected for export
//! - ICS: rendering and streaming calendar events
//! - Report: the load-then-export entry point

pub mod dates;
mod error;
pub mod ics;
pub mod outline;
mod report;

pub use dates::DateSet;
pub use error::ConvertError;
pub use ics::{DEFAULT_TIMEZONE, export_clock, format_event, write_calendar};
pub use outline::{ClockInterval, OutlineNode, OutlineTree, load};
pub use report::{ReportOptions, clock_report};
