//! org2cal CLI library.
//!
//! This crate provides the command-line interface for converting org clock
//! entries to iCalendar files.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, ConfigAction, ExportArgs};
pub use config::{Config, StoredConfig};
