//! Errors raised while reading a record dump.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors produced by [`crate::JsonRecordDecoder`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordDumpError {
    /// The dump could not be opened.
    #[error("failed to open record dump at {path}")]
    Open {
        #[source]
        source: io::Error,
        path: Utf8PathBuf,
    },
    /// Reading a line failed.
    #[error("failed to read record dump {path} at line {line}")]
    Read {
        #[source]
        source: io::Error,
        path: Utf8PathBuf,
        line: usize,
    },
    /// A line was not valid JSON.
    #[error("failed to parse record at {path}:{line}")]
    Parse {
        #[source]
        source: serde_json::Error,
        path: Utf8PathBuf,
        line: usize,
    },
    /// A line held valid JSON that was not an object.
    #[error("record at {path}:{line} is not a JSON object")]
    NotAnObject { path: Utf8PathBuf, line: usize },
}

impl RecordDumpError {
    /// One-based line number of the failing record, when known.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Open { .. } => None,
            Self::Read { line, .. } | Self::Parse { line, .. } | Self::NotAnObject { line, .. } => {
                Some(*line)
            }
        }
    }
}
