//! Mediadump Core Library
//!
//! This library provides the core functionality for the mediadump tool,
//! which copies the media files referenced by a storefront's CSV exports
//! into a local directory tree, a bounded number of requests at a time.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`input`] - CSV readers and media-directive extraction producing the job set
//! - [`download`] - Remote mapping, streaming HTTP client and the bounded engine
//! - [`report`] - Per-target outcome lines and the final counts line

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod input;
pub mod report;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use download::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadError, DownloadFileResult, DownloadStats,
    EngineError, FailureStage, Fetcher, HttpClient, MediaFetcher, RemoteBase, RemoteBaseError,
};
pub use input::{
    InputError, JobSet, Target, extract_media_links, read_content_file, read_values_file,
    resolve_job_set,
};
pub use report::{Outcome, Reporter};
