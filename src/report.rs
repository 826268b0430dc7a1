//! Per-target outcome lines and the final counts line.
//!
//! Lines are written as tasks finish, so their order follows completion, not
//! the job set. Each line is written and flushed under one lock; concurrent
//! tasks never interleave partial lines.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use crate::download::{DownloadError, DownloadFileResult, DownloadStats};
use crate::input::Target;

/// Result of one fetch-and-persist task.
#[derive(Debug)]
pub enum Outcome {
    /// The file was written.
    Success {
        /// The target that was fetched.
        target: Target,
        /// Where and how much was written.
        written: DownloadFileResult,
    },
    /// The single attempt failed.
    Failure {
        /// The target that failed.
        target: Target,
        /// The stage-tagged cause.
        error: DownloadError,
    },
    /// The task died before producing a result.
    Aborted {
        /// The target whose task died.
        target: Target,
        /// Description of the abort.
        detail: String,
    },
}

impl Outcome {
    /// Returns the originating target.
    #[must_use]
    pub fn target(&self) -> &Target {
        match self {
            Self::Success { target, .. }
            | Self::Failure { target, .. }
            | Self::Aborted { target, .. } => target,
        }
    }

    /// Returns true for [`Outcome::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Formats the line printed for this outcome.
    #[must_use]
    pub fn line(&self) -> String {
        match self {
            Self::Success { target, written } => {
                format!(
                    "Successfully downloaded: {target} -> {}",
                    written.path.display()
                )
            }
            Self::Failure { target, error } => format!("Error downloading file: {target} {error}"),
            Self::Aborted { target, detail } => {
                format!("Error downloading file: {target} {detail}")
            }
        }
    }
}

/// Serialised writer for outcome lines.
pub struct Reporter {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}

impl Reporter {
    /// Creates a reporter writing to `writer`.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Mutex::new(Box::new(writer)),
        }
    }

    /// Creates a reporter writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Creates a reporter writing into memory, returning the buffer handle.
    #[must_use]
    pub fn in_memory() -> (Self, ReportBuffer) {
        let buffer = ReportBuffer::default();
        (Self::new(buffer.clone()), buffer)
    }

    /// Prints the line for one outcome.
    pub fn report(&self, outcome: &Outcome) {
        self.write_line(&outcome.line());
    }

    /// Prints the counts line after every task has finished.
    pub fn summary(&self, stats: &DownloadStats) {
        self.write_line(&format!(
            "Finished: {} downloaded, {} failed, {} total",
            stats.completed(),
            stats.failed(),
            stats.total()
        ));
    }

    fn write_line(&self, line: &str) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        let written = writeln!(sink, "{line}").and_then(|()| sink.flush());
        if let Err(error) = written {
            // Losing the report stream (closed pipe) must not fail the downloads.
            warn!(error = %error, "failed to write report line");
        }
    }
}

/// Shared in-memory sink for [`Reporter::in_memory`].
#[derive(Debug, Clone, Default)]
pub struct ReportBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl ReportBuffer {
    /// Returns everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Returns the written lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for ReportBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
