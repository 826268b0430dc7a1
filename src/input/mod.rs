//! Input resolution: turns CSV exports into the set of targets for one run.
//!
//! Two sources are supported and may be combined:
//!
//! - **values** exports, whose first column already holds resource paths
//!   such as `/catalog/product/a/b.jpg`;
//! - **content** exports, whose first column holds page markup with embedded
//!   `{{media url=PATH}}` directives, each becoming `/media/PATH`.
//!
//! The combined list is de-duplicated with a stable, first-seen filter and
//! frozen into a [`JobSet`].

mod csv_source;
mod error;
mod media;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use tracing::{debug, info, instrument};

pub use csv_source::{read_content_file, read_values_file};
pub use error::InputError;
pub use media::{MEDIA_ROOT, extract_media_links};

/// A resource path relative to both the remote base and the output directory.
///
/// Always non-empty; surrounding whitespace is stripped on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target(String);

impl Target {
    /// Creates a target, returning `None` for blank input.
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the target path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Target {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The de-duplicated, ordered targets of one run. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSet {
    targets: Vec<Target>,
}

impl JobSet {
    /// Builds a job set, keeping the first occurrence of every target.
    #[must_use]
    pub fn from_targets(targets: impl IntoIterator<Item = Target>) -> Self {
        Self {
            targets: dedup_stable(targets),
        }
    }

    /// Returns the number of targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if there is nothing to download.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Returns the targets in resolution order.
    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Returns an iterator over the targets.
    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }
}

impl FromIterator<Target> for JobSet {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self::from_targets(iter)
    }
}

impl IntoIterator for JobSet {
    type Item = Target;
    type IntoIter = std::vec::IntoIter<Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.into_iter()
    }
}

impl<'a> IntoIterator for &'a JobSet {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

/// Reads the given sources and builds the job set.
///
/// Content references come first, then values paths; the concatenation is
/// de-duplicated as a whole. Passing neither source yields an empty set.
///
/// # Errors
///
/// Returns the first [`InputError`] hit while opening or parsing a file.
#[instrument(skip_all)]
pub fn resolve_job_set(
    values_file: Option<&Path>,
    content_file: Option<&Path>,
) -> Result<JobSet, InputError> {
    let mut targets = Vec::new();

    if let Some(path) = content_file {
        let extracted = read_content_file(path)?;
        debug!(path = %path.display(), targets = extracted.len(), "content file resolved");
        targets.extend(extracted);
    }

    if let Some(path) = values_file {
        let listed = read_values_file(path)?;
        debug!(path = %path.display(), targets = listed.len(), "values file resolved");
        targets.extend(listed);
    }

    let jobs = JobSet::from_targets(targets);
    info!(targets = jobs.len(), "job set resolved");
    Ok(jobs)
}

/// Order-preserving unique filter.
pub(crate) fn dedup_stable<T, I>(items: I) -> Vec<T>
where
    T: Clone + Eq + std::hash::Hash,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
