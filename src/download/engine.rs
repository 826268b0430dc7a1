//! Download engine: a bounded worker pool over one job set.
//!
//! Every target gets its own Tokio task immediately; a per-run semaphore
//! caps how many of them are inside the fetch-and-persist step at once.
//! [`DownloadEngine::run`] returns after every task has reported.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mediadump_core::download::{DownloadEngine, HttpClient, MediaFetcher, RemoteBase};
//! use mediadump_core::input::resolve_job_set;
//! use mediadump_core::report::Reporter;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let jobs = resolve_job_set(Some(Path::new("values.csv")), None)?;
//! let remote = RemoteBase::parse("shop.example.com")?;
//! let fetcher = Arc::new(MediaFetcher::new(HttpClient::new(), remote, "./dump"));
//! let reporter = Arc::new(Reporter::stdout());
//!
//! let engine = DownloadEngine::new(10)?;
//! let stats = engine.run(jobs, fetcher, Arc::clone(&reporter)).await;
//! reporter.summary(&stats);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::constants::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::fetcher::Fetcher;
use crate::input::{JobSet, Target};
use crate::report::{Outcome, Reporter};

/// Error type for download engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// Statistics from one run.
///
/// Atomic counters so concurrent tasks can update them without a lock.
#[derive(Debug, Default)]
pub struct DownloadStats {
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of files written.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Returns the number of failed targets.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the number of reported outcomes (completed + failed).
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed() + self.failed()
    }

    pub(crate) fn increment_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    fn record(&self, outcome: &Outcome) {
        if outcome.is_success() {
            self.increment_completed();
        } else {
            self.increment_failed();
        }
    }

    fn snapshot(&self) -> Self {
        Self {
            completed: AtomicUsize::new(self.completed()),
            failed: AtomicUsize::new(self.failed()),
        }
    }
}

/// Bounded-concurrency scheduler for fetch-and-persist tasks.
///
/// # Concurrency Model
///
/// - All targets are dispatched as Tokio tasks up front
/// - Each task acquires a semaphore permit before fetching
/// - Permits are released when the fetch finishes, success or failure (RAII)
/// - A failed target never cancels or delays its siblings
#[derive(Debug, Clone)]
pub struct DownloadEngine {
    concurrency: usize,
}

impl DownloadEngine {
    /// Creates an engine running at most `concurrency` fetches at once.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-1000). A zero-capacity pool would never grant a
    /// permit.
    ///
    /// # Example
    ///
    /// ```
    /// use mediadump_core::download::DownloadEngine;
    ///
    /// let engine = DownloadEngine::new(10).unwrap();
    /// assert_eq!(engine.concurrency(), 10);
    /// assert!(DownloadEngine::new(0).is_err());
    /// ```
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download engine");
        Ok(Self { concurrency })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs one task per target and waits for all of them.
    ///
    /// Each finished task prints its outcome through `reporter` straight
    /// away. Individual failures are reported and counted, never returned.
    /// A task that panics is reported as a failure too, so the number of
    /// outcomes always equals the number of targets.
    #[instrument(skip_all, fields(targets = jobs.len(), concurrency = self.concurrency))]
    pub async fn run(
        &self,
        jobs: JobSet,
        fetcher: Arc<dyn Fetcher>,
        reporter: Arc<Reporter>,
    ) -> DownloadStats {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let stats = Arc::new(DownloadStats::new());
        let mut handles = Vec::with_capacity(jobs.len());

        info!("starting downloads");

        for target in jobs {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&fetcher);
            let reporter = Arc::clone(&reporter);
            let stats = Arc::clone(&stats);
            let task_target = target.clone();

            let handle = tokio::spawn(async move {
                let outcome = fetch_with_permit(&semaphore, fetcher.as_ref(), task_target).await;
                reporter.report(&outcome);
                stats.record(&outcome);
            });
            handles.push((target, handle));
        }

        debug!(task_count = handles.len(), "waiting for downloads to complete");

        for (target, handle) in handles {
            if let Err(e) = handle.await {
                warn!(target = %target, error = %e, "download task panicked");
                let outcome = Outcome::Aborted {
                    target,
                    detail: format!("download task panicked: {e}"),
                };
                reporter.report(&outcome);
                stats.record(&outcome);
            }
        }

        info!(
            completed = stats.completed(),
            failed = stats.failed(),
            total = stats.total(),
            "downloads finished"
        );

        stats.snapshot()
    }
}

/// Holds a permit for the duration of one fetch.
async fn fetch_with_permit(semaphore: &Semaphore, fetcher: &dyn Fetcher, target: Target) -> Outcome {
    // The semaphore is owned by this run and never closed.
    let Ok(_permit) = semaphore.acquire().await else {
        return Outcome::Aborted {
            target,
            detail: "download pool closed".to_string(),
        };
    };

    debug!(target = %target, "fetching");
    match fetcher.fetch(&target).await {
        Ok(written) => Outcome::Success { target, written },
        Err(error) => {
            warn!(target = %target, stage = %error.stage(), error = %error, "download failed");
            Outcome::Failure { target, error }
        }
    }
}
