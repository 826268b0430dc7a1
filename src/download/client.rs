//! HTTP client wrapper for fetching media files.
//!
//! This module provides the `HttpClient` struct which performs the
//! fetch-and-persist steps for one destination: directories, file, GET,
//! status check, streamed body.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::user_agent;

/// HTTP client for downloading files with streaming support.
///
/// Create once and share; clones reuse the same connection pool.
///
/// # Example
///
/// ```no_run
/// use mediadump_core::download::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let result = client
///     .download_to_path(
///         "https://shop.example.com/media/logo.png",
///         Path::new("./dump/media/logo.png"),
///     )
///     .await?;
/// println!("Wrote {} bytes to {}", result.bytes_written, result.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// What a successful download left on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFileResult {
    /// Path of the written file.
    pub path: PathBuf,
    /// Number of body bytes written.
    pub bytes_written: u64,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Request timeout: 5 minutes
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a new HTTP client with explicit timeout values in seconds.
    ///
    /// # Errors
    ///
    /// Returns the builder error if the TLS backend cannot be initialised.
    #[instrument(level = "debug")]
    pub fn with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_download_user_agent())
            .build()?;
        Ok(Self { client })
    }

    /// Downloads `url` into `destination`, overwriting any existing file.
    ///
    /// Steps, in order: create missing parent directories, create/truncate
    /// the file, send one GET, require `200 OK`, stream the body to disk.
    /// A file created by this call is removed again if a later step fails,
    /// so a failed download never leaves an empty or truncated file behind.
    ///
    /// # Errors
    ///
    /// Returns a [`DownloadError`] tagged with the failing stage:
    /// directory creation, file creation, network, status, or write.
    #[must_use = "download result contains the path and size of the written file"]
    #[instrument(skip(self), fields(url = %url, path = %destination.display()))]
    pub async fn download_to_path(
        &self,
        url: &str,
        destination: &Path,
    ) -> Result<DownloadFileResult, DownloadError> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DownloadError::directory(parent, e))?;
        }

        let file = File::create(destination)
            .await
            .map_err(|e| DownloadError::file(destination, e))?;

        let outcome = self.fetch_into(file, url, destination).await;
        if outcome.is_err() {
            debug!("cleaning up partial file after error");
            let _ = tokio::fs::remove_file(destination).await;
        }
        let bytes_written = outcome?;

        info!(bytes = bytes_written, "download complete");
        Ok(DownloadFileResult {
            path: destination.to_path_buf(),
            bytes_written,
        })
    }

    /// Sends the request and streams a 200 response into `file`.
    async fn fetch_into(
        &self,
        mut file: File,
        url: &str,
        destination: &Path,
    ) -> Result<u64, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        stream_to_file(&mut file, response, url, destination).await
    }
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::write(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::write(file_path, e))?;

    Ok(bytes_written)
}
