//! Error types for the download module.
//!
//! Every per-target failure carries the stage it happened in so the reporter
//! and the tests can tell a missing directory from a 404.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The step of a fetch-and-persist task at which it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    /// The target could not be mapped to a URL or a path under the output root.
    Target,
    /// Parent directories could not be created.
    Directory,
    /// The destination file could not be created or truncated.
    File,
    /// The request failed (connect, TLS, timeout, body read).
    Network,
    /// The server answered with something other than 200 OK.
    Status,
    /// The body could not be written to disk.
    Write,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Target => "target",
            Self::Directory => "directory",
            Self::File => "file",
            Self::Network => "network",
            Self::Status => "status",
            Self::Write => "write",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while fetching and persisting a single target.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The target would resolve outside the output root or names no file.
    #[error("invalid target {target}: {reason}")]
    InvalidTarget {
        /// The offending target path.
        target: String,
        /// Why the target was rejected.
        reason: &'static str,
    },

    /// The composed URL is malformed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Parent directories for the destination could not be created.
    #[error("could not create directories {path}: {source}")]
    Directory {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The destination file could not be created.
    #[error("could not create file {path}: {source}")]
    File {
        /// The destination file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, broken body stream).
    #[error("failed to download file from {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The server did not answer 200 OK.
    #[error("bad status: {status} {reason} ({url})")]
    HttpStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Canonical reason phrase, empty when unknown.
        reason: String,
    },

    /// Writing the body to disk failed.
    #[error("failed to save file to {path}: {source}")]
    Write {
        /// The destination file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates an invalid-target error.
    pub fn invalid_target(target: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidTarget {
            target: target.into(),
            reason,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a directory-creation error.
    pub fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Directory {
            path: path.into(),
            source,
        }
    }

    /// Creates a file-creation error.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error; the reason phrase is looked up from the code.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self::HttpStatus {
            url: url.into(),
            status,
            reason,
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Returns the stage at which the task failed.
    #[must_use]
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::InvalidTarget { .. } | Self::InvalidUrl { .. } => FailureStage::Target,
            Self::Directory { .. } => FailureStage::Directory,
            Self::File { .. } => FailureStage::File,
            Self::Network { .. } | Self::Timeout { .. } => FailureStage::Network,
            Self::HttpStatus { .. } => FailureStage::Status,
            Self::Write { .. } => FailureStage::Write,
        }
    }

    /// Returns the HTTP status for status failures.
    #[must_use]
    pub fn http_status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// URL or path the source error does not carry.
