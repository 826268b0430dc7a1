//! Mapping of targets onto the remote host and the local output tree.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use url::Url;

use super::DownloadError;
use crate::input::Target;

/// Errors for an unusable remote base value.
#[derive(Debug, Clone, Error)]
pub enum RemoteBaseError {
    /// The value is empty.
    #[error("remote domain must not be empty")]
    Empty,

    /// The value does not parse as an http(s) origin.
    #[error("invalid remote domain '{value}': {reason}")]
    Invalid {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Scheme and authority every target is fetched from.
///
/// A bare host such as `shop.example.com` is served over HTTPS; a value that
/// already names a scheme (`http://127.0.0.1:8080`) is used as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBase {
    origin: String,
}

impl RemoteBase {
    /// Parses a domain or origin.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteBaseError`] if the value is empty, uses a scheme other
    /// than http/https, has no host, or carries a path, query or fragment.
    pub fn parse(domain: &str) -> Result<Self, RemoteBaseError> {
        let trimmed = domain.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(RemoteBaseError::Empty);
        }

        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        let invalid = |reason: &str| RemoteBaseError::Invalid {
            value: domain.to_string(),
            reason: reason.to_string(),
        };

        let parsed = Url::parse(&candidate).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("only http and https are supported"));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(invalid("no host"));
        }
        if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("expected a host without path, query or fragment"));
        }

        Ok(Self { origin: candidate })
    }

    /// Returns the origin, e.g. `https://shop.example.com`.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Composes the remote URL of a target.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidUrl`] if the result does not parse.
    pub fn url_for(&self, target: &Target) -> Result<String, DownloadError> {
        let path = target.as_str();
        let url = if path.starts_with('/') {
            format!("{}{path}", self.origin)
        } else {
            format!("{}/{path}", self.origin)
        };
        Url::parse(&url).map_err(|_| DownloadError::invalid_url(url.clone()))?;
        Ok(url)
    }
}

/// Returns where a target is stored: the output root joined with the
/// target's relative path.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidTarget`] for targets that climb out of the
/// output root or do not end in a file name.
pub fn destination_path(output_root: &Path, target: &Target) -> Result<PathBuf, DownloadError> {
    let raw = target.as_str();
    if raw.ends_with('/') {
        return Err(DownloadError::invalid_target(raw, "does not name a file"));
    }

    let relative = Path::new(raw.trim_start_matches('/'));
    let mut destination = output_root.to_path_buf();
    let mut has_file_name = false;
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                destination.push(part);
                has_file_name = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(DownloadError::invalid_target(
                    raw,
                    "escapes the output directory",
                ));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(DownloadError::invalid_target(raw, "is not a relative path"));
            }
        }
    }

    if !has_file_name {
        return Err(DownloadError::invalid_target(raw, "does not name a file"));
    }
    Ok(destination)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::download::FailureStage;

    fn target(raw: &str) -> Target {
        Target::new(raw).unwrap()
    }

    #[test]
    fn test_remote_base_bare_host_defaults_to_https() {
        let base = RemoteBase::parse("shop.example.com").unwrap();
        assert_eq!(base.origin(), "https://shop.example.com");
    }

    #[test]
    fn test_remote_base_keeps_explicit_scheme_and_port() {
        let base = RemoteBase::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(base.origin(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_remote_base_rejects_empty_and_unsupported_values() {
        assert!(matches!(RemoteBase::parse("  "), Err(RemoteBaseError::Empty)));
        assert!(matches!(
            RemoteBase::parse("ftp://files.example.com"),
            Err(RemoteBaseError::Invalid { .. })
        ));
        assert!(matches!(
            RemoteBase::parse("shop.example.com/store"),
            Err(RemoteBaseError::Invalid { .. })
        ));
        assert!(matches!(
            RemoteBase::parse("https://shop.example.com?x=1"),
            Err(RemoteBaseError::Invalid { .. })
        ));
    }

    #[test]
    fn test_url_for_joins_absolute_and_relative_targets() {
        let base = RemoteBase::parse("shop.example.com").unwrap();
        assert_eq!(
            base.url_for(&target("/media/wysiwyg/x.jpg")).unwrap(),
            "https://shop.example.com/media/wysiwyg/x.jpg"
        );
        assert_eq!(
            base.url_for(&target("media/x.jpg")).unwrap(),
            "https://shop.example.com/media/x.jpg"
        );
    }

    #[test]
    fn test_destination_path_preserves_directory_structure() {
        let path = destination_path(Path::new("/out"), &target("/media/wysiwyg/plp/x.jpg")).unwrap();
        assert_eq!(path, PathBuf::from("/out/media/wysiwyg/plp/x.jpg"));

        let path = destination_path(Path::new("out"), &target("catalog/./a.jpg")).unwrap();
        assert_eq!(path, PathBuf::from("out/catalog/a.jpg"));
    }

    #[test]
    fn test_destination_path_rejects_escaping_targets() {
        let error = destination_path(Path::new("/out"), &target("/media/../../etc/passwd"))
            .unwrap_err();
        assert_eq!(error.stage(), FailureStage::Target);
        assert!(error.to_string().contains("escapes the output directory"));
    }

    #[test]
    fn test_destination_path_rejects_directory_targets() {
        assert!(destination_path(Path::new("/out"), &target("/media/")).is_err());
        assert!(destination_path(Path::new("/out"), &target("/")).is_err());
        assert!(destination_path(Path::new("/out"), &target("./.")).is_err());
    }
}
