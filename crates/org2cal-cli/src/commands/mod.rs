//! CLI subcommand implementations.

pub mod config;
pub mod export;
pub mod util;
