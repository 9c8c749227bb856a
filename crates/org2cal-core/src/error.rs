//! Typed failures for loading outlines and writing calendars.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while converting clock entries to a calendar.
///
/// Every variant aborts the current operation; nothing is recovered inside
/// the library.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source could not be read or the destination could not be written.
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The outline content is not well-formed.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A clock timestamp is not a real calendar date or time.
    #[error("malformed timestamp on line {line}: {value}")]
    MalformedTimestamp { line: usize, value: String },
}

impl ConvertError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }
}
