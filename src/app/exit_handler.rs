//! Exit code logic for the mediadump process.
//!
//! Single responsibility: map completion/failure counts to the process exit outcome.

use crate::ProcessExit;

/// Determines the process exit outcome from completed and failed download counts.
pub(crate) fn determine_exit_outcome(completed: usize, failed: usize) -> ProcessExit {
    if failed == 0 {
        ProcessExit::Success
    } else if completed > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}

/// Applies the exit policy: per-target failures only change the exit status
/// when `strict` is set.
pub(crate) fn resolve_exit(strict: bool, completed: usize, failed: usize) -> ProcessExit {
    if strict {
        determine_exit_outcome(completed, failed)
    } else {
        ProcessExit::Success
    }
}
