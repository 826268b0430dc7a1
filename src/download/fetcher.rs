//! The fetch-and-persist task behind the scheduler.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use super::client::{DownloadFileResult, HttpClient};
use super::error::DownloadError;
use super::remote::{RemoteBase, destination_path};
use crate::input::Target;

/// Performs the single download attempt for one target.
///
/// The engine only talks to this trait, so tests can swap the network for an
/// instrumented implementation.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `target` and persists it, returning what was written.
    async fn fetch(&self, target: &Target) -> Result<DownloadFileResult, DownloadError>;
}

/// Production fetcher: remote base + output root + HTTP client.
#[derive(Debug, Clone)]
pub struct MediaFetcher {
    client: HttpClient,
    remote: RemoteBase,
    output_root: PathBuf,
}

impl MediaFetcher {
    /// Creates a fetcher writing below `output_root`.
    pub fn new(client: HttpClient, remote: RemoteBase, output_root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            remote,
            output_root: output_root.into(),
        }
    }

    /// Returns the remote base.
    #[must_use]
    pub fn remote(&self) -> &RemoteBase {
        &self.remote
    }

    /// Returns the output root.
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }
}

#[async_trait]
impl Fetcher for MediaFetcher {
    #[instrument(skip(self), fields(target = %target))]
    async fn fetch(&self, target: &Target) -> Result<DownloadFileResult, DownloadError> {
        let url = self.remote.url_for(target)?;
        let destination = destination_path(&self.output_root, target)?;
        self.client.download_to_path(&url, &destination).await
    }
}
