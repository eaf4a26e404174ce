//! Roster error types.
//!
//! Every failure an operation can report to the shell. None of them are
//! fatal: the shell prints the message and returns to the menu.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when operating on a roster.
#[derive(Debug, Error)]
pub enum RosterError {
    /// No student with the given id is on the roster.
    #[error("student not found: {id}")]
    NotFound { id: String },

    /// A file could not be opened for reading or writing.
    #[error("cannot access file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A JSON snapshot could not be parsed or serialized.
    #[error("invalid snapshot {}: {source}", .path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A spreadsheet could not be built or written.
    #[error("cannot write workbook {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

impl RosterError {
    pub(crate) fn not_found(id: &str) -> Self {
        RosterError::NotFound { id: id.to_string() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RosterError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the error refers to an unknown student id.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RosterError::NotFound { .. })
    }
}

/// Convenience alias for roster results.
pub type Result<T, E = RosterError> = std::result::Result<T, E>;
