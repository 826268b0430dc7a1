//! CLI entry point for the mediadump tool.

use std::process::ExitCode;

mod app;
mod cli;

/// Final status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Every target downloaded, or failures ignored by the exit policy.
    Success,
    /// Some targets failed (strict exit only).
    Partial,
    /// Every target failed (strict exit only).
    Failure,
    /// Required arguments were missing.
    Usage,
}

impl ProcessExit {
    fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Partial | Self::Usage => 1,
            Self::Failure => 2,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match app::runtime::run_mediadump().await {
        Ok(exit) => ExitCode::from(exit.code()),
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
