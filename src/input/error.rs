//! Error types for reading CSV job sources.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the run before any download is scheduled.
#[derive(Debug, Error)]
pub enum InputError {
    /// The CSV file could not be opened.
    #[error("could not open file {path}: {source}")]
    Open {
        /// The file that failed to open.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV document is structurally invalid (ragged rows, broken quoting, bad UTF-8).
    #[error("could not read file {path}: {source}")]
    Malformed {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying CSV error, including the record position.
        #[source]
        source: csv::Error,
    },
}

impl InputError {
    /// Creates an open error.
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Creates a malformed-document error.
    pub fn malformed(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Malformed {
            path: path.into(),
            source,
        }
    }

    /// Returns the file the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Open { path, .. } | Self::Malformed { path, .. } => path,
        }
    }
}
