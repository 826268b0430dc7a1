//! Bounded-concurrency download of media targets.
//!
//! This module maps each target onto the remote host and the local output
//! tree, performs one streamed GET per target, and schedules those attempts
//! with a fixed upper bound on in-flight requests.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Output tree mirrors the remote path below the output root
//! - Configurable timeouts (30s connect, 5min total by default)
//! - Stage-tagged error types with full context
//! - Partial files removed when an attempt fails
//!
//! # Example
//!
//! ```no_run
//! use mediadump_core::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let written = client
//!     .download_to_path(
//!         "https://shop.example.com/media/logo.png",
//!         Path::new("./dump/media/logo.png"),
//!     )
//!     .await?;
//! println!("Downloaded: {}", written.path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod fetcher;
mod remote;

pub use client::{DownloadFileResult, HttpClient};
pub use constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, MAX_CONCURRENCY, MIN_CONCURRENCY, READ_TIMEOUT_SECS,
};
pub use engine::{DownloadEngine, DownloadStats, EngineError};
pub use error::{DownloadError, FailureStage};
pub use fetcher::{Fetcher, MediaFetcher};
pub use remote::{RemoteBase, RemoteBaseError, destination_path};
